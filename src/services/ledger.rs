//! Ledger service
//!
//! Holds the append-only list of transactions for a session and computes the
//! derived aggregates: balance, per-kind totals, expenses by category, monthly
//! net savings and activity days.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Money, Transaction, TransactionKind};

/// Summed expenses for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub transaction_count: usize,
}

/// Income, expenses and net savings within one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyNet {
    pub year: i32,
    pub month: u32,
    pub income: Money,
    pub expenses: Money,
}

impl MonthlyNet {
    pub fn net(&self) -> Money {
        self.income - self.expenses
    }
}

/// Ordered, append-only collection of transactions
///
/// Insertion order is chronological order; there is no edit or delete.
/// Per-kind totals are kept alongside the list and checked on every add.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    income: Money,
    expenses: Money,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a user-entered amount, requiring a positive value
    pub fn parse_amount(input: &str) -> FinanceResult<Money> {
        let amount = Money::parse(input).map_err(|_| {
            FinanceError::Validation(format!("Amount must be a positive number: '{}'", input.trim()))
        })?;

        if !amount.is_positive() {
            return Err(FinanceError::Validation(format!(
                "Amount must be a positive number: '{}'",
                input.trim()
            )));
        }

        if amount.exceeds_max() {
            return Err(FinanceError::Validation(format!(
                "Amount exceeds the maximum of {}: '{}'",
                Money::MAX_AMOUNT,
                input.trim()
            )));
        }

        Ok(amount)
    }

    /// Record a new transaction dated `date`
    ///
    /// Fails with a validation error, leaving the ledger untouched, when the
    /// amount is not positive or above [`Money::MAX_AMOUNT`], when the
    /// category is empty, or when the running total would overflow.
    pub fn add_transaction(
        &mut self,
        kind: TransactionKind,
        amount: Money,
        category: &str,
        description: Option<String>,
        date: NaiveDate,
    ) -> FinanceResult<Transaction> {
        let txn = Transaction::new(kind, amount, category, description, date);

        if let Err(e) = txn.validate() {
            warn!(%kind, amount = amount.cents(), category, "rejected transaction: {}", e);
            return Err(FinanceError::Validation(e.to_string()));
        }

        let total = match kind {
            TransactionKind::Income => &mut self.income,
            TransactionKind::Expense => &mut self.expenses,
        };
        *total = total.checked_add(txn.amount).ok_or_else(|| {
            warn!(%kind, amount = amount.cents(), "rejected transaction: total overflow");
            FinanceError::Validation(format!("{} total would exceed the supported range", kind))
        })?;

        info!(
            id = %txn.id,
            %kind,
            amount = txn.amount.cents(),
            category = %txn.category,
            "transaction recorded"
        );

        self.transactions.push(txn.clone());
        Ok(txn)
    }

    /// All transactions in insertion order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of income minus sum of expenses, exact in cents
    pub fn total_balance(&self) -> Money {
        self.income - self.expenses
    }

    pub fn total_income(&self) -> Money {
        self.income
    }

    pub fn total_expenses(&self) -> Money {
        self.expenses
    }

    /// Expense totals per category, in first-seen order
    pub fn expenses_by_category(&self) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for txn in self.transactions.iter().filter(|t| t.is_expense()) {
            match index.get(txn.category.as_str()) {
                Some(&i) => {
                    totals[i].total += txn.amount;
                    totals[i].transaction_count += 1;
                }
                None => {
                    index.insert(txn.category.as_str(), totals.len());
                    totals.push(CategoryTotal {
                        category: txn.category.clone(),
                        total: txn.amount,
                        transaction_count: 1,
                    });
                }
            }
        }

        debug!(categories = totals.len(), "computed expenses by category");
        totals
    }

    /// The last `n` transactions, most recent first
    pub fn recent_transactions(&self, n: usize) -> Vec<&Transaction> {
        self.transactions.iter().rev().take(n).collect()
    }

    /// Income and expenses grouped by calendar month, oldest first
    pub fn monthly_totals(&self) -> Vec<MonthlyNet> {
        let mut months: BTreeMap<(i32, u32), MonthlyNet> = BTreeMap::new();

        for txn in &self.transactions {
            let key = (txn.date.year(), txn.date.month());
            let entry = months.entry(key).or_insert(MonthlyNet {
                year: key.0,
                month: key.1,
                income: Money::zero(),
                expenses: Money::zero(),
            });
            match txn.kind {
                TransactionKind::Income => entry.income += txn.amount,
                TransactionKind::Expense => entry.expenses += txn.amount,
            }
        }

        months.into_values().collect()
    }

    /// Net savings (income minus expenses) for one calendar month
    pub fn monthly_net(&self, year: i32, month: u32) -> Money {
        self.monthly_totals()
            .into_iter()
            .find(|m| m.year == year && m.month == month)
            .map(|m| m.net())
            .unwrap_or_default()
    }

    /// Distinct dates with at least one transaction, ascending
    pub fn activity_days(&self) -> Vec<NaiveDate> {
        self.transactions
            .iter()
            .map(|t| t.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
