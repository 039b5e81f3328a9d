//! Spending Report
//!
//! Breaks down expenses by category with each category's share of the total.

use std::io::Write;

use crate::display::report::{format_bar, format_percentage};
use crate::error::{FinanceError, FinanceResult};
use crate::models::Money;
use crate::services::Ledger;

/// Spending breakdown for one category
#[derive(Debug, Clone)]
pub struct SpendingByCategory {
    pub category: String,
    pub total_spending: Money,
    pub transaction_count: usize,
    /// Percentage of total spending
    pub percentage: f64,
}

#[derive(Debug, Clone)]
pub struct SpendingReport {
    /// Categories in first-seen order
    pub categories: Vec<SpendingByCategory>,
    pub total_spending: Money,
    pub total_income: Money,
    /// Number of expense transactions
    pub expense_count: usize,
    pub currency_symbol: String,
}

impl SpendingReport {
    pub fn generate(ledger: &Ledger, currency_symbol: &str) -> Self {
        let total_spending = ledger.total_expenses();

        let categories: Vec<SpendingByCategory> = ledger
            .expenses_by_category()
            .into_iter()
            .map(|c| SpendingByCategory {
                percentage: c.total.percent_of(total_spending),
                category: c.category,
                total_spending: c.total,
                transaction_count: c.transaction_count,
            })
            .collect();

        let expense_count = categories.iter().map(|c| c.transaction_count).sum();

        Self {
            categories,
            total_spending,
            total_income: ledger.total_income(),
            expense_count,
            currency_symbol: currency_symbol.to_string(),
        }
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Spending Report\n");
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!("Total Spending: {}\n", self.money(self.total_spending)));
        output.push_str(&format!("Total Income:   {}\n\n", self.money(self.total_income)));

        if self.categories.is_empty() {
            output.push_str("No expenses recorded.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<20} {:>14} {:>6} {:>7}  {}\n",
            "Category", "Amount", "Count", "%", "Share"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        let max = self
            .categories
            .iter()
            .map(|c| c.percentage)
            .fold(0.0, f64::max);

        for category in &self.categories {
            output.push_str(&format!(
                "{:<20} {:>14} {:>6} {:>7}  {}\n",
                category.category,
                self.money(category.total_spending),
                category.transaction_count,
                format_percentage(category.percentage),
                format_bar(category.percentage, max, 20)
            ));
        }

        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>14} {:>6}\n",
            "TOTAL SPENDING",
            self.money(self.total_spending),
            self.expense_count
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FinanceResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let to_export = |e: csv::Error| FinanceError::Export(e.to_string());

        csv.write_record(["Category", "Amount", "Transaction Count", "Percentage"])
            .map_err(to_export)?;

        for category in &self.categories {
            csv.write_record([
                category.category.clone(),
                category.total_spending.to_decimal_string(),
                category.transaction_count.to_string(),
                format!("{:.2}", category.percentage),
            ])
            .map_err(to_export)?;
        }

        csv.write_record([
            "TOTAL".to_string(),
            self.total_spending.to_decimal_string(),
            self.expense_count.to_string(),
            "100.00".to_string(),
        ])
        .map_err(to_export)?;

        csv.flush()?;
        Ok(())
    }
}
