//! Reports module for ContaCerta
//!
//! Provides the session overview (dashboard) and the spending analysis by
//! category.

pub mod overview;
pub mod spending;

pub use overview::{GoalProgressRow, OverviewReport};
pub use spending::{SpendingByCategory, SpendingReport};
