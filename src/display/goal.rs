//! Goal display formatting

use chrono::NaiveDate;
use tabled::{settings::Style, Table, Tabled};

use super::report::{format_bar, truncate};
use crate::models::Goal;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Icon")]
    icon: &'static str,
    #[tabled(rename = "Progress")]
    bar: String,
    #[tabled(rename = "%")]
    percent: String,
    #[tabled(rename = "Saved")]
    current: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
}

fn status(goal: &Goal, today: NaiveDate, date_format: &str) -> String {
    match goal.deadline {
        _ if goal.is_complete() => "concluída".to_string(),
        Some(deadline) if goal.is_overdue(today) => {
            format!("{} (atrasada)", deadline.format(date_format))
        }
        Some(deadline) => deadline.format(date_format).to_string(),
        None => "-".to_string(),
    }
}

/// Format goals as a table with progress bars
pub fn format_goal_table(
    goals: &[Goal],
    today: NaiveDate,
    currency_symbol: &str,
    date_format: &str,
) -> String {
    if goals.is_empty() {
        return "No goals found.\n".to_string();
    }

    let rows = goals.iter().map(|goal| {
        let progress = goal.progress_ratio();
        GoalRow {
            name: truncate(&goal.name, 24),
            icon: goal.icon.label(),
            bar: format_bar(progress.min(100.0), 100.0, 10),
            percent: format!("{:.1}%", progress),
            current: goal.current_amount.format_with_symbol(currency_symbol),
            target: goal.target_amount.format_with_symbol(currency_symbol),
            deadline: status(goal, today, date_format),
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}
