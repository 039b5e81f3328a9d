//! Configuration module for ContaCerta
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - Gamification and authentication tunables

pub mod paths;
pub mod settings;

pub use paths::ContaCertaPaths;
pub use settings::{AuthSettings, GamificationSettings, InsightSettings, Settings};
