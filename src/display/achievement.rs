//! Achievement and level display formatting

use tabled::{settings::Style, Table, Tabled};

use super::report::format_bar;
use crate::models::{Achievement, AchievementIcon};
use crate::services::ProgressionEngine;

#[derive(Tabled)]
struct AchievementRow {
    #[tabled(rename = "")]
    mark: &'static str,
    #[tabled(rename = "Achievement")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Unlocked")]
    unlocked_on: String,
}

fn icon_symbol(icon: AchievementIcon) -> &'static str {
    match icon {
        AchievementIcon::CheckCircle => "✔",
        AchievementIcon::PiggyBank => "$",
        AchievementIcon::Trophy => "🏆",
        AchievementIcon::Award => "★",
    }
}

/// Format the catalog with unlock state
pub fn format_achievement_table(achievements: &[Achievement], date_format: &str) -> String {
    let rows = achievements.iter().map(|a| AchievementRow {
        mark: if a.unlocked { icon_symbol(a.icon) } else { "·" },
        name: a.name.clone(),
        description: a.description.clone(),
        unlocked_on: a
            .unlocked_on
            .map(|d| d.format(date_format).to_string())
            .unwrap_or_else(|| "-".to_string()),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Level, XP bar and achievement count, followed by the catalog table
pub fn format_progression(engine: &ProgressionEngine, date_format: &str) -> String {
    let per_level = engine.settings().xp_per_level;
    let mut output = format!(
        "Nível {}  {}  {} XP ({} para o próximo nível)\n",
        engine.level(),
        format_bar(engine.level_progress(), 100.0, 20),
        engine.xp(),
        engine.state().xp_to_next_level(per_level)
    );
    output.push_str(&format!(
        "Conquistas desbloqueadas: {}/{}\n",
        engine.unlocked_count(),
        engine.achievements().len()
    ));
    output.push_str(&format_achievement_table(engine.achievements(), date_format));
    output
}
