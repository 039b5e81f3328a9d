//! Service layer for ContaCerta
//!
//! Services own the in-memory collections and enforce validation; the
//! session wires them together so progression and insights always see the
//! current ledger and goals.

pub mod auth;
pub mod goals;
pub mod insights;
pub mod ledger;
pub mod progression;

pub use auth::{AuthBackend, AuthMode, AuthRequest, Authenticator, RetryPolicy, SimulatedAuthBackend};
pub use goals::GoalTracker;
pub use insights::{EntropyTipSource, InsightGenerator, SeededTipSource, TipSource};
pub use ledger::{CategoryTotal, Ledger, MonthlyNet};
pub use progression::{ProgressionEngine, ProgressionUpdate};
