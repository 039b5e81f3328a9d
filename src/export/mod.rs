//! Export module for ContaCerta
//!
//! Writes a session out in multiple formats:
//! - CSV: transactions or goals (spreadsheet-compatible)
//! - JSON: machine-readable snapshot of the whole session
//! - YAML: human-readable snapshot of the whole session

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::str::FromStr;

pub use self::csv::{export_goals_csv, export_transactions_csv};
pub use json::{export_session_json, import_from_json, SessionExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_session_yaml, import_from_yaml};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "csv" => Ok(Self::Csv),
            other => Err(format!("Unknown export format '{}'. Use json, yaml or csv", other)),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_session() -> crate::session::Session {
    use crate::clock::ManualClock;
    use crate::config::Settings;
    use crate::models::{GoalIcon, Money, TransactionKind, User};
    use chrono::NaiveDate;
    use std::sync::Arc;

    let clock = ManualClock::new(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    let mut session = crate::session::Session::new(Settings::default(), Arc::new(clock.clone()))
        .with_user(User::new("Ana", "ana@example.com"));
    session
        .add_transaction(
            TransactionKind::Expense,
            Money::from_cents(5000),
            "Alimentação",
            Some("Mercado, feira".into()),
        )
        .unwrap();
    clock.advance_days(3).unwrap();
    session
        .add_transaction(TransactionKind::Income, Money::from_cents(20000), "Salário", None)
        .unwrap();
    let goal = session
        .add_goal("Viagem", Money::from_cents(10_000), None, GoalIcon::Plane)
        .unwrap();
    session.contribute(goal.id, Money::from_cents(10_000)).unwrap();
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("yml".parse::<ExportFormat>(), Ok(ExportFormat::Yaml));
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
