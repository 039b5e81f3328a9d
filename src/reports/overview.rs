//! Overview Report
//!
//! The dashboard view of a session: balance cards, level progress, recent
//! activity, goal progress and insight highlights.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::display::report::{double_separator, format_bar, separator};
use crate::models::{Money, Transaction, TransactionKind};
use crate::services::progression::daily_streak;
use crate::session::Session;

/// Goals shown on the overview
const OVERVIEW_GOALS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct GoalProgressRow {
    pub name: String,
    pub current: Money,
    pub target: Money,
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub date: NaiveDate,
    pub user_name: Option<String>,
    pub currency_symbol: String,
    pub balance: Money,
    pub income: Money,
    pub expenses: Money,
    /// Income minus expenses within the current calendar month
    pub month_net: Money,
    pub level: u32,
    pub xp: u64,
    pub level_progress: f64,
    pub xp_to_next_level: u64,
    pub achievements_unlocked: usize,
    pub achievements_total: usize,
    pub daily_streak: u32,
    pub recent: Vec<Transaction>,
    pub goals: Vec<GoalProgressRow>,
    pub goal_count: usize,
    pub top_category: String,
    pub average_daily_expense: Money,
    pub savings_rate: f64,
    pub balance_alert: Option<String>,
    pub motivational_message: String,
}

impl OverviewReport {
    pub fn generate(session: &Session) -> Self {
        let ledger = session.ledger();
        let progression = session.progression();
        let insights = session.insights();
        let settings = session.settings();
        let today = session.today();
        let xp_per_level = settings.gamification.xp_per_level;

        let goals = session
            .goals()
            .goals()
            .iter()
            .take(OVERVIEW_GOALS)
            .map(|g| GoalProgressRow {
                name: g.name.clone(),
                current: g.current_amount,
                target: g.target_amount,
                progress: g.progress_ratio(),
            })
            .collect();

        Self {
            date: today,
            user_name: session.user().map(|u| u.name.clone()),
            currency_symbol: settings.currency_symbol.clone(),
            balance: ledger.total_balance(),
            income: ledger.total_income(),
            expenses: ledger.total_expenses(),
            month_net: ledger.monthly_net(today.year(), today.month()),
            level: progression.level(),
            xp: progression.xp(),
            level_progress: progression.level_progress(),
            xp_to_next_level: progression.state().xp_to_next_level(xp_per_level),
            achievements_unlocked: progression.unlocked_count(),
            achievements_total: progression.achievements().len(),
            daily_streak: daily_streak(&ledger.activity_days()),
            recent: ledger
                .recent_transactions(settings.insights.recent_transactions)
                .into_iter()
                .cloned()
                .collect(),
            goals,
            goal_count: session.goals().len(),
            top_category: insights.top_expense_category_label(),
            average_daily_expense: insights.average_daily_expense(),
            savings_rate: insights.savings_rate(),
            balance_alert: insights.balance_alert().map(str::to_string),
            motivational_message: insights.daily_motivational_message(today).to_string(),
        }
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        match &self.user_name {
            Some(name) => output.push_str(&format!("Olá, {}!\n", name)),
            None => output.push_str("ContaCerta\n"),
        }
        output.push_str(&format!("{}\n", self.motivational_message));
        output.push_str(&double_separator(60));
        output.push('\n');

        output.push_str(&format!("Saldo Total:   {:>16}\n", self.money(self.balance)));
        output.push_str(&format!("Receitas:      {:>16}\n", self.money(self.income)));
        output.push_str(&format!("Despesas:      {:>16}\n", self.money(self.expenses)));
        output.push_str(&format!("Saldo do mês:  {:>16}\n", self.money(self.month_net)));
        if let Some(alert) = &self.balance_alert {
            output.push_str(&format!("\n! {}\n", alert));
        }
        output.push('\n');

        output.push_str(&format!(
            "Nível {}  {}  {} XP ({} para o próximo nível)\n",
            self.level,
            format_bar(self.level_progress, 100.0, 20),
            self.xp,
            self.xp_to_next_level
        ));
        output.push_str(&format!(
            "Conquistas: {}/{}   Sequência: {} dia(s)\n",
            self.achievements_unlocked, self.achievements_total, self.daily_streak
        ));
        output.push_str(&separator(60));
        output.push('\n');

        output.push_str("Transações Recentes\n");
        if self.recent.is_empty() {
            output.push_str("  Nenhuma transação ainda.\n");
        }
        for txn in &self.recent {
            let sign = match txn.kind {
                TransactionKind::Income => "+",
                TransactionKind::Expense => "-",
            };
            output.push_str(&format!(
                "  {} {:<20} {}{}\n",
                txn.date.format("%d/%m/%Y"),
                txn.category,
                sign,
                self.money(txn.amount)
            ));
        }
        output.push('\n');

        output.push_str("Metas\n");
        if self.goals.is_empty() {
            output.push_str("  Nenhuma meta criada.\n");
        }
        for goal in &self.goals {
            output.push_str(&format!(
                "  {:<20} {} {:>5.1}%  {} / {}\n",
                goal.name,
                format_bar(goal.progress.min(100.0), 100.0, 10),
                goal.progress,
                self.money(goal.current),
                self.money(goal.target)
            ));
        }
        if self.goal_count > self.goals.len() {
            output.push_str(&format!(
                "  ... e mais {} meta(s)\n",
                self.goal_count - self.goals.len()
            ));
        }
        output.push_str(&separator(60));
        output.push('\n');

        output.push_str(&format!("Maior gasto:         {}\n", self.top_category));
        output.push_str(&format!(
            "Média diária:        {}\n",
            self.money(self.average_daily_expense)
        ));
        output.push_str(&format!("Taxa de poupança:    {:.1}%\n", self.savings_rate));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Settings;
    use crate::models::{GoalIcon, User};
    use std::sync::Arc;

    fn scenario() -> Session {
        let clock = ManualClock::new(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        let mut session = Session::new(Settings::default(), Arc::new(clock))
            .with_user(User::new("Ana", "ana@example.com"));
        session
            .add_transaction(TransactionKind::Expense, Money::from_cents(5000), "Alimentação", None)
            .unwrap();
        session
            .add_transaction(TransactionKind::Expense, Money::from_cents(3000), "Transporte", None)
            .unwrap();
        session
            .add_transaction(TransactionKind::Income, Money::from_cents(20000), "Salário", None)
            .unwrap();
        for name in ["Viagem", "Carro", "Casa", "Reserva"] {
            session
                .add_goal(name, Money::from_cents(100_000), None, GoalIcon::Target)
                .unwrap();
        }
        session
    }

    #[test]
    fn test_generate_overview() {
        let report = OverviewReport::generate(&scenario());

        assert_eq!(report.balance, Money::from_cents(12_000));
        assert_eq!(report.income, Money::from_cents(20_000));
        assert_eq!(report.expenses, Money::from_cents(8_000));
        assert_eq!(report.month_net, Money::from_cents(12_000));
        assert_eq!(report.xp, 30);
        assert_eq!(report.level, 1);
        assert_eq!(report.xp_to_next_level, 70);
        assert_eq!(report.achievements_unlocked, 1);
        assert_eq!(report.achievements_total, 4);
        assert_eq!(report.daily_streak, 1);
        assert_eq!(report.recent.len(), 3);
        assert_eq!(report.recent[0].category, "Salário");
        assert_eq!(report.goals.len(), 3);
        assert_eq!(report.goal_count, 4);
        assert_eq!(report.top_category, "Alimentação");
        assert_eq!(report.average_daily_expense, Money::from_cents(267));
        assert_eq!(report.balance_alert, None);
    }

    #[test]
    fn test_format_terminal() {
        let text = OverviewReport::generate(&scenario()).format_terminal();
        assert!(text.starts_with("Olá, Ana!"));
        assert!(text.contains("Saldo Total:"));
        assert!(text.contains("R$ 120,00"));
        assert!(text.contains("e mais 1 meta(s)"));
        assert!(!text.contains("! Atenção"));
    }

    #[test]
    fn test_month_net_only_counts_current_month() {
        let clock = ManualClock::new(NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
        let mut session = Session::new(Settings::default(), Arc::new(clock.clone()));
        session
            .add_transaction(TransactionKind::Income, Money::from_cents(50_000), "Salário", None)
            .unwrap();
        clock.advance_days(1).unwrap();
        session
            .add_transaction(TransactionKind::Expense, Money::from_cents(2_000), "Lazer", None)
            .unwrap();

        let report = OverviewReport::generate(&session);
        assert_eq!(report.balance, Money::from_cents(48_000));
        assert_eq!(report.month_net, Money::from_cents(-2_000));
        assert!(report.format_terminal().contains("Saldo do mês:"));
    }

    #[test]
    fn test_negative_balance_shows_alert() {
        let clock = ManualClock::new(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        let mut session = Session::new(Settings::default(), Arc::new(clock));
        session
            .add_transaction(TransactionKind::Expense, Money::from_cents(100), "Lazer", None)
            .unwrap();

        let report = OverviewReport::generate(&session);
        assert!(report.balance_alert.is_some());
        assert!(report.format_terminal().contains("! Atenção!"));
        assert!(report.format_terminal().starts_with("ContaCerta"));
    }
}
