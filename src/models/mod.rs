//! Core data models for ContaCerta
//!
//! This module contains the data structures of the personal finance domain:
//! transactions, savings goals, achievements, progression and users.

pub mod achievement;
pub mod goal;
pub mod ids;
pub mod money;
pub mod progression;
pub mod transaction;
pub mod user;

pub use achievement::{catalog, Achievement, AchievementIcon, AchievementId};
pub use goal::{Goal, GoalIcon, GoalValidationError};
pub use ids::{GoalId, TransactionId, UserId};
pub use money::{Money, MoneyParseError};
pub use progression::{level_for_xp, LevelUp, ProgressionState};
pub use transaction::{Transaction, TransactionKind, TransactionValidationError};
pub use user::User;
