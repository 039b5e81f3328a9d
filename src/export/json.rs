//! JSON Export functionality
//!
//! Exports a session snapshot to JSON format with schema versioning.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Achievement, Goal, Money, ProgressionState, Transaction, User};
use crate::session::Session;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything a session holds, frozen at export time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    pub transactions: Vec<Transaction>,

    pub goals: Vec<Goal>,

    pub progression: ProgressionState,

    pub achievements: Vec<Achievement>,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,
    pub goal_count: usize,
    pub unlocked_achievements: usize,
    pub balance: Money,

    /// Date range of transactions (earliest)
    pub earliest_transaction: Option<String>,

    /// Date range of transactions (latest)
    pub latest_transaction: Option<String>,
}

impl SessionExport {
    pub fn from_session(session: &Session) -> Self {
        let transactions = session.ledger().transactions().to_vec();
        let goals = session.goals().goals().to_vec();
        let achievements = session.progression().achievements().to_vec();

        let earliest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .min()
            .map(|d| d.to_string());

        let latest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .max()
            .map(|d| d.to_string());

        let metadata = ExportMetadata {
            transaction_count: transactions.len(),
            goal_count: goals.len(),
            unlocked_achievements: achievements.iter().filter(|a| a.unlocked).count(),
            balance: session.ledger().total_balance(),
            earliest_transaction,
            latest_transaction,
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            user: session.user().cloned(),
            transactions,
            goals,
            progression: session.progression().state(),
            achievements,
            metadata,
        }
    }

    /// Check the invariants a well-formed snapshot holds
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let mut seen = HashSet::new();
        for txn in &self.transactions {
            if !seen.insert(txn.id) {
                return Err(format!("Duplicate transaction id {}", txn.id));
            }
            txn.validate()
                .map_err(|e| format!("Transaction {}: {}", txn.id, e))?;
        }

        for goal in &self.goals {
            goal.validate().map_err(|e| format!("Goal {}: {}", goal.id, e))?;
        }

        if self.metadata.transaction_count != self.transactions.len() {
            return Err(format!(
                "Metadata lists {} transactions, found {}",
                self.metadata.transaction_count,
                self.transactions.len()
            ));
        }

        Ok(())
    }
}

/// Export the session to JSON
pub fn export_session_json<W: Write>(
    session: &Session,
    writer: &mut W,
    pretty: bool,
) -> FinanceResult<()> {
    let export = SessionExport::from_session(session);

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| FinanceError::Export(e.to_string()))?;
    writeln!(writer)?;

    Ok(())
}

/// Read back a JSON export
pub fn import_from_json(json_str: &str) -> FinanceResult<SessionExport> {
    let export: SessionExport = serde_json::from_str(json_str)?;
    export.validate().map_err(FinanceError::Export)?;
    Ok(export)
}
