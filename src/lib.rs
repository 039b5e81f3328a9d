//! ContaCerta - gamified personal finance core
//!
//! This library records income and expense transactions, tracks savings goals,
//! awards XP, levels and achievements for activity, and derives simple
//! insights from the current data. All state lives in memory inside a
//! [`session::Session`].
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, transactions, goals, achievements)
//! - `services`: Ledger, goal tracker, progression engine, insights and auth
//! - `session`: Per-user state tying the services together
//! - `script`: Scripted sessions that can be replayed deterministically
//! - `reports`, `display`, `export`: Output for the terminal and for files
//! - `cli`: Command handlers for the `contacerta` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use contacerta::config::{ContaCertaPaths, Settings};
//!
//! let paths = ContaCertaPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut session = Session::new(settings, Arc::new(SystemClock));
//! ```

pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod script;
pub mod services;
pub mod session;

pub use error::{FinanceError, FinanceResult};
