//! CSV Export functionality
//!
//! Exports transactions and goals to spreadsheet-compatible CSV.

use std::io::Write;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Goal, Transaction, TransactionKind};

fn to_export(e: csv::Error) -> FinanceError {
    FinanceError::Export(e.to_string())
}

/// Export transactions to CSV, in ledger order
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> FinanceResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(["ID", "Date", "Type", "Category", "Description", "Amount"])
        .map_err(to_export)?;

    for txn in transactions {
        let kind = match txn.kind {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };

        csv.write_record([
            txn.id.to_string(),
            txn.date.to_string(),
            kind.to_string(),
            txn.category.clone(),
            txn.description.clone().unwrap_or_default(),
            txn.signed_amount().to_decimal_string(),
        ])
        .map_err(to_export)?;
    }

    csv.flush()?;
    Ok(())
}

/// Export goals with their progress to CSV
pub fn export_goals_csv<W: Write>(goals: &[Goal], writer: W) -> FinanceResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(["ID", "Name", "Target", "Saved", "Progress", "Deadline"])
        .map_err(to_export)?;

    for goal in goals {
        csv.write_record([
            goal.id.to_string(),
            goal.name.clone(),
            goal.target_amount.to_decimal_string(),
            goal.current_amount.to_decimal_string(),
            format!("{:.2}", goal.progress_ratio()),
            goal.deadline.map(|d| d.to_string()).unwrap_or_default(),
        ])
        .map_err(to_export)?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::sample_session;

    #[test]
    fn test_export_transactions_csv() {
        let session = sample_session();
        let mut csv_output = Vec::new();
        export_transactions_csv(session.ledger().transactions(), &mut csv_output).unwrap();

        let csv_string = String::from_utf8(csv_output).unwrap();
        let lines: Vec<&str> = csv_string.lines().collect();
        assert_eq!(lines[0], "ID,Date,Type,Category,Description,Amount");
        assert!(lines[1].ends_with(",2025-01-15,expense,Alimentação,\"Mercado, feira\",-50.00"));
        assert!(lines[2].ends_with(",2025-01-18,income,Salário,,200.00"));
    }

    #[test]
    fn test_export_goals_csv() {
        let session = sample_session();
        let mut csv_output = Vec::new();
        export_goals_csv(session.goals().goals(), &mut csv_output).unwrap();

        let csv_string = String::from_utf8(csv_output).unwrap();
        assert!(csv_string.contains("Viagem,100.00,100.00,100.00,"));
    }
}
