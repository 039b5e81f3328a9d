//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! including tables and progress bars.

pub mod achievement;
pub mod goal;
pub mod report;
pub mod transaction;

pub use achievement::{format_achievement_table, format_progression};
pub use goal::format_goal_table;
pub use transaction::{format_signed_amount, format_transaction_table};
