//! Insight generator
//!
//! Derives tips, the daily motivational message and spending highlights from
//! the current ledger snapshot. Nothing here is cached; every call
//! recomputes from the data it borrows.

use chrono::{Datelike, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::config::InsightSettings;
use crate::models::Money;
use crate::services::ledger::Ledger;

/// Day number of 1970-01-01 counted from 0001-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Label used when there is no expense data
pub const NOT_AVAILABLE: &str = "N/A";

const TIPS: &[&str] = &[
    "💡 Você gastou mais com alimentação este mês. Que tal preparar mais refeições em casa?",
    "🎯 Está indo bem! Continue assim para alcançar suas metas financeiras.",
    "📊 Seus gastos com transporte aumentaram. Considere usar transporte público.",
    "💰 Parabéns! Você conseguiu economizar mais este mês comparado ao anterior.",
    "🏆 Você está no caminho certo para sua meta de viagem!",
];

const MOTIVATIONAL_MESSAGES: &[&str] = &[
    "🌟 Cada centavo economizado é um passo em direção aos seus sonhos!",
    "💪 Você tem o controle das suas finanças. Continue assim!",
    "🎯 Pequenos passos levam a grandes conquistas financeiras!",
    "✨ Sua disciplina financeira está construindo um futuro brilhante!",
];

const RECOMMENDATIONS: &[&str] = &[
    "Continue registrando suas transações diariamente",
    "Defina metas específicas para cada categoria",
    "Reserve 20% da renda para poupança",
];

const NEGATIVE_BALANCE_ALERT: &str = "Atenção! Seu saldo está negativo. \
     Considere revisar seus gastos e criar um plano de recuperação.";

/// Source of randomness for tip selection
pub trait TipSource {
    /// Return an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Non-deterministic source drawing from the OS-backed v4 UUID generator
#[derive(Debug, Default, Clone, Copy)]
pub struct EntropyTipSource;

impl TipSource for EntropyTipSource {
    fn pick(&mut self, len: usize) -> usize {
        (Uuid::new_v4().as_u128() % len as u128) as usize
    }
}

/// Deterministic source: the same seed always yields the same sequence
#[derive(Debug, Clone)]
pub struct SeededTipSource {
    state: u64,
}

impl SeededTipSource {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    // splitmix64
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl TipSource for SeededTipSource {
    fn pick(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}

/// All tips that `daily_tip` can return
pub fn tip_pool() -> &'static [&'static str] {
    TIPS
}

/// Uniform pick from the tip pool
pub fn pick_tip(source: &mut dyn TipSource) -> &'static str {
    TIPS[source.pick(TIPS.len()) % TIPS.len()]
}

/// Message of the day: stable for a calendar day, rotates at midnight
pub fn motivational_message_for(date: NaiveDate) -> &'static str {
    let days = (i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE)
        .rem_euclid(MOTIVATIONAL_MESSAGES.len() as i64);
    MOTIVATIONAL_MESSAGES[days as usize]
}

/// Read-only view over a session's ledger
pub struct InsightGenerator<'a> {
    ledger: &'a Ledger,
    settings: &'a InsightSettings,
}

impl<'a> InsightGenerator<'a> {
    pub fn new(ledger: &'a Ledger, settings: &'a InsightSettings) -> Self {
        Self { ledger, settings }
    }

    /// Pick a tip uniformly from the fixed pool
    pub fn daily_tip(&self, source: &mut dyn TipSource) -> &'static str {
        pick_tip(source)
    }

    pub fn daily_motivational_message(&self, today: NaiveDate) -> &'static str {
        motivational_message_for(today)
    }

    /// Category with the highest expense total
    ///
    /// Ties go to the category that appeared first in the ledger.
    pub fn top_expense_category(&self) -> Option<String> {
        let mut best: Option<(String, Money)> = None;
        for entry in self.ledger.expenses_by_category() {
            match &best {
                Some((_, total)) if entry.total <= *total => {}
                _ => best = Some((entry.category, entry.total)),
            }
        }
        best.map(|(category, _)| category)
    }

    /// Same as [`Self::top_expense_category`], with "N/A" when empty
    pub fn top_expense_category_label(&self) -> String {
        self.top_expense_category()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Total expenses spread over a fixed number of days
    ///
    /// The divisor comes from settings (30 by default), not from the actual
    /// span of the data. Rounded half-up to the cent.
    pub fn average_daily_expense(&self) -> Money {
        let total = self.ledger.total_expenses();
        let average = total
            .div_rounded(i64::from(self.settings.average_expense_days))
            .unwrap_or_default();
        debug!(total = total.cents(), average = average.cents(), "average daily expense");
        average
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        RECOMMENDATIONS
    }

    /// Warning shown while the balance is negative
    pub fn balance_alert(&self) -> Option<&'static str> {
        if self.ledger.total_balance().is_negative() {
            Some(NEGATIVE_BALANCE_ALERT)
        } else {
            None
        }
    }

    /// Share of income kept after expenses, as a percentage
    pub fn savings_rate(&self) -> f64 {
        let income = self.ledger.total_income();
        if !income.is_positive() {
            return 0.0;
        }
        self.ledger.total_balance().percent_of(income)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    fn add(ledger: &mut Ledger, kind: TransactionKind, cents: i64, category: &str) {
        ledger
            .add_transaction(kind, Money::from_cents(cents), category, None, day())
            .unwrap();
    }

    #[test]
    fn test_top_category_and_tie_break() {
        let mut ledger = Ledger::new();
        let settings = InsightSettings::default();

        assert_eq!(
            InsightGenerator::new(&ledger, &settings).top_expense_category_label(),
            "N/A"
        );

        add(&mut ledger, TransactionKind::Expense, 3000, "Transporte");
        add(&mut ledger, TransactionKind::Expense, 1000, "Lazer");
        add(&mut ledger, TransactionKind::Expense, 2000, "Lazer");
        add(&mut ledger, TransactionKind::Income, 90_000, "Salário");

        let insights = InsightGenerator::new(&ledger, &settings);
        assert_eq!(insights.top_expense_category().as_deref(), Some("Transporte"));
    }

    #[test]
    fn test_top_category_picks_maximum() {
        let mut ledger = Ledger::new();
        let settings = InsightSettings::default();
        add(&mut ledger, TransactionKind::Expense, 1000, "Casa");
        add(&mut ledger, TransactionKind::Expense, 5000, "Saúde");

        let insights = InsightGenerator::new(&ledger, &settings);
        assert_eq!(insights.top_expense_category_label(), "Saúde");
    }

    #[test]
    fn test_average_daily_expense_uses_fixed_divisor() {
        let mut ledger = Ledger::new();
        let settings = InsightSettings::default();
        add(&mut ledger, TransactionKind::Expense, 5000, "Alimentação");
        add(&mut ledger, TransactionKind::Expense, 3000, "Transporte");
        add(&mut ledger, TransactionKind::Income, 20000, "Salário");

        let insights = InsightGenerator::new(&ledger, &settings);
        assert_eq!(insights.average_daily_expense(), Money::from_cents(267));
    }

    #[test]
    fn test_average_daily_expense_empty() {
        let ledger = Ledger::new();
        let settings = InsightSettings::default();
        let insights = InsightGenerator::new(&ledger, &settings);
        assert_eq!(insights.average_daily_expense(), Money::zero());
    }

    #[test]
    fn test_seeded_tips_are_deterministic() {
        let ledger = Ledger::new();
        let settings = InsightSettings::default();
        let insights = InsightGenerator::new(&ledger, &settings);

        let first: Vec<&str> = {
            let mut source = SeededTipSource::new(42);
            (0..5).map(|_| insights.daily_tip(&mut source)).collect()
        };
        let second: Vec<&str> = {
            let mut source = SeededTipSource::new(42);
            (0..5).map(|_| insights.daily_tip(&mut source)).collect()
        };
        assert_eq!(first, second);
        assert!(first.iter().all(|tip| tip_pool().contains(tip)));
    }

    #[test]
    fn test_entropy_tip_is_from_pool() {
        let ledger = Ledger::new();
        let settings = InsightSettings::default();
        let insights = InsightGenerator::new(&ledger, &settings);
        let tip = insights.daily_tip(&mut EntropyTipSource);
        assert!(tip_pool().contains(&tip));
    }

    #[test]
    fn test_motivational_message_rotates_daily() {
        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let tuesday = monday.succ_opt().unwrap();
        assert_eq!(motivational_message_for(monday), motivational_message_for(monday));
        assert_ne!(motivational_message_for(monday), motivational_message_for(tuesday));

        let four_days_later = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(
            motivational_message_for(monday),
            motivational_message_for(four_days_later)
        );
    }

    #[test]
    fn test_motivational_message_matches_epoch_index() {
        // 1970-01-01 is day zero
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(motivational_message_for(epoch), MOTIVATIONAL_MESSAGES[0]);
        let day_five = NaiveDate::from_ymd_opt(1970, 1, 6).unwrap();
        assert_eq!(motivational_message_for(day_five), MOTIVATIONAL_MESSAGES[1]);
    }

    #[test]
    fn test_balance_alert_and_savings_rate() {
        let mut ledger = Ledger::new();
        let settings = InsightSettings::default();
        add(&mut ledger, TransactionKind::Expense, 1000, "Compras");
        assert!(InsightGenerator::new(&ledger, &settings)
            .balance_alert()
            .is_some());

        add(&mut ledger, TransactionKind::Income, 4000, "Freelance");
        let insights = InsightGenerator::new(&ledger, &settings);
        assert!(insights.balance_alert().is_none());
        assert_eq!(insights.savings_rate(), 75.0);
        assert_eq!(insights.recommendations().len(), 3);
    }
}
