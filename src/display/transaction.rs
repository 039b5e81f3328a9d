//! Transaction display formatting

use tabled::{settings::Style, Table, Tabled};

use super::report::truncate;
use crate::models::{Transaction, TransactionKind};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Signed amount: "+R$ 200,00" for income, "-R$ 50,00" for expenses
pub fn format_signed_amount(txn: &Transaction, currency_symbol: &str) -> String {
    let sign = match txn.kind {
        TransactionKind::Income => "+",
        TransactionKind::Expense => "-",
    };
    format!("{}{}", sign, txn.amount.format_with_symbol(currency_symbol))
}

/// Format transactions as a table, in the order given
pub fn format_transaction_table<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    currency_symbol: &str,
    date_format: &str,
) -> String {
    let rows: Vec<TransactionRow> = transactions
        .into_iter()
        .map(|txn| TransactionRow {
            date: txn.date.format(date_format).to_string(),
            kind: match txn.kind {
                TransactionKind::Income => "Receita",
                TransactionKind::Expense => "Despesa",
            },
            category: truncate(&txn.category, 20),
            description: truncate(txn.description.as_deref().unwrap_or(""), 30),
            amount: format_signed_amount(txn, currency_symbol),
        })
        .collect();

    if rows.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}
