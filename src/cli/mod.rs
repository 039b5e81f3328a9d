//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the session and services.

pub mod auth;
pub mod insight;
pub mod replay;

pub use auth::{handle_login_command, handle_register_command, LoginArgs, RegisterArgs};
pub use insight::{handle_message_command, handle_tip_command};
pub use replay::{handle_replay_command, ReplayArgs, ReportKind};
