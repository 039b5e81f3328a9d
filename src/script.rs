//! Scripted sessions
//!
//! A session script is a YAML or JSON document listing user actions. Replaying
//! it drives a [`Session`] on a manual clock, so the same script always
//! produces the same ledger, goals, XP and achievements.
//!
//! ```yaml
//! start_date: 2025-03-01
//! user: { name: Ana, email: ana@example.com }
//! actions:
//!   - action: add_transaction
//!     kind: income
//!     amount: "200,00"
//!     category: Salário
//!   - action: add_goal
//!     name: Viagem
//!     target: 1000
//!     icon: plane
//!   - action: contribute
//!     goal: Viagem
//!     amount: 250
//!   - action: advance_days
//!     days: 1
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::ManualClock;
use crate::config::Settings;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{GoalIcon, Money, TransactionKind, User};
use crate::services::Ledger;
use crate::session::{Session, SessionEvent};

/// An amount as written in a script: a number or a text like `"50,25"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl AmountInput {
    pub fn to_money(&self) -> FinanceResult<Money> {
        match self {
            Self::Integer(units) => Ledger::parse_amount(&units.to_string()),
            Self::Decimal(value) => Ledger::parse_amount(&value.to_string()),
            Self::Text(text) => Ledger::parse_amount(text),
        }
    }
}

impl fmt::Display for AmountInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(units) => write!(f, "{}", units),
            Self::Decimal(value) => write!(f, "{}", value),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    AddTransaction {
        kind: TransactionKind,
        amount: AmountInput,
        category: String,
        #[serde(default)]
        description: Option<String>,
    },
    AddGoal {
        name: String,
        target: AmountInput,
        #[serde(default)]
        deadline: Option<NaiveDate>,
        #[serde(default)]
        icon: GoalIcon,
    },
    /// Contribute to the goal with this name
    Contribute { goal: String, amount: AmountInput },
    /// Move the session clock forward
    AdvanceDays { days: u64 },
}

impl fmt::Display for ScriptAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddTransaction {
                kind,
                amount,
                category,
                ..
            } => write!(f, "add {} {} ({})", kind, amount, category),
            Self::AddGoal { name, target, .. } => write!(f, "add goal '{}' ({})", name, target),
            Self::Contribute { goal, amount } => write!(f, "contribute {} to '{}'", amount, goal),
            Self::AdvanceDays { days } => write!(f, "advance {} day(s)", days),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    /// Date of the first action; defaults to the caller's today
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub user: Option<ScriptUser>,

    #[serde(default)]
    pub actions: Vec<ScriptAction>,
}

impl SessionScript {
    /// Load a script, choosing the parser from the file extension
    ///
    /// `.json` files are read as JSON; anything else as YAML.
    pub fn load(path: &Path) -> FinanceResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FinanceError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let script = if is_json {
            Self::from_json(&contents)?
        } else {
            Self::from_yaml(&contents)?
        };
        debug!(path = %path.display(), actions = script.actions.len(), "loaded session script");
        Ok(script)
    }

    pub fn from_yaml(contents: &str) -> FinanceResult<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_json(contents: &str) -> FinanceResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }
}

/// Result of replaying a script
pub struct ReplayResult {
    pub session: Session,
    /// Number of actions that succeeded
    pub applied: usize,
    /// Everything the session announced, in order
    pub events: Vec<SessionEvent>,
    /// Error messages keyed by 1-based action number
    pub error_messages: BTreeMap<usize, String>,
}

impl ReplayResult {
    pub fn errors(&self) -> usize {
        self.error_messages.len()
    }
}

/// Run every action of `script` against a fresh session
///
/// A failing action is recorded and skipped; the remaining actions still run.
pub fn replay(script: &SessionScript, settings: Settings, default_start: NaiveDate) -> ReplayResult {
    let clock = ManualClock::new(script.start_date.unwrap_or(default_start));
    let mut session = Session::new(settings, Arc::new(clock.clone()));

    if let Some(user) = &script.user {
        session.sign_in(User::new(user.name.as_str(), &user.email));
    }

    let mut result_events = Vec::new();
    let mut error_messages = BTreeMap::new();
    let mut applied = 0;

    for (index, action) in script.actions.iter().enumerate() {
        let number = index + 1;
        match apply(&mut session, &clock, action) {
            Ok(()) => {
                applied += 1;
                result_events.extend(session.take_events());
            }
            Err(e) => {
                warn!(action = number, "{} failed: {}", action, e);
                error_messages.insert(number, e.to_string());
            }
        }
    }

    info!(
        applied,
        errors = error_messages.len(),
        transactions = session.ledger().len(),
        goals = session.goals().len(),
        "replay complete"
    );

    ReplayResult {
        session,
        applied,
        events: result_events,
        error_messages,
    }
}

fn apply(session: &mut Session, clock: &ManualClock, action: &ScriptAction) -> FinanceResult<()> {
    match action {
        ScriptAction::AddTransaction {
            kind,
            amount,
            category,
            description,
        } => {
            session.add_transaction(*kind, amount.to_money()?, category, description.clone())?;
        }
        ScriptAction::AddGoal {
            name,
            target,
            deadline,
            icon,
        } => {
            session.add_goal(name, target.to_money()?, *deadline, *icon)?;
        }
        ScriptAction::Contribute { goal, amount } => {
            session.contribute_by_name(goal, amount.to_money()?)?;
        }
        ScriptAction::AdvanceDays { days } => {
            let today = clock.advance_days(*days)?;
            debug!(%today, "clock advanced");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AchievementId;
    use std::io::Write;

    const SCENARIO: &str = r#"
start_date: 2025-03-01
user:
  name: Ana
  email: ana@example.com
actions:
  - action: add_transaction
    kind: expense
    amount: 50
    category: Alimentação
  - action: add_transaction
    kind: expense
    amount: "30,00"
    category: Transporte
  - action: add_transaction
    kind: income
    amount: 200.0
    category: Salário
    description: Março
  - action: add_goal
    name: Viagem
    target: 1000
    icon: plane
  - action: contribute
    goal: Viagem
    amount: 500
  - action: contribute
    goal: Casa
    amount: 10
"#;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_replay_scenario() {
        let script = SessionScript::from_yaml(SCENARIO).unwrap();
        let result = replay(&script, Settings::default(), start());
        let session = &result.session;

        assert_eq!(result.applied, 5);
        assert_eq!(result.errors(), 1);
        assert!(result.error_messages[&6].contains("Goal not found"));

        assert_eq!(session.ledger().total_balance(), Money::from_cents(12_000));
        let recent: Vec<&str> = session
            .ledger()
            .recent_transactions(2)
            .iter()
            .map(|t| t.category.as_str())
            .collect();
        assert_eq!(recent, vec!["Salário", "Transporte"]);

        let goal = session.goals().find_by_name("Viagem").unwrap();
        assert_eq!(goal.progress_ratio(), 50.0);
        assert_eq!(goal.icon, GoalIcon::Plane);

        assert_eq!(session.today(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(session.user().map(|u| u.email.as_str()), Some("ana@example.com"));
        assert!(result.events.contains(&SessionEvent::AchievementUnlocked {
            id: AchievementId::FirstStep
        }));
    }

    #[test]
    fn test_advance_days_builds_streak() {
        let mut script = SessionScript::default();
        for _ in 0..7 {
            script.actions.push(ScriptAction::AddTransaction {
                kind: TransactionKind::Expense,
                amount: AmountInput::Integer(5),
                category: "Lazer".into(),
                description: None,
            });
            script.actions.push(ScriptAction::AdvanceDays { days: 1 });
        }

        let result = replay(&script, Settings::default(), start());
        assert_eq!(result.errors(), 0);
        assert!(result
            .session
            .progression()
            .is_unlocked(AchievementId::Disciplined));
        assert_eq!(result.session.today(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn test_invalid_amount_is_recorded() {
        let script = SessionScript::from_json(
            r#"{"actions": [{"action": "add_transaction", "kind": "income", "amount": "abc", "category": "Salário"}]}"#,
        )
        .unwrap();
        let result = replay(&script, Settings::default(), start());
        assert_eq!(result.applied, 0);
        assert!(result.error_messages[&1].starts_with("Validation error"));
        assert!(result.session.ledger().is_empty());
    }

    #[test]
    fn test_advance_past_last_date_is_a_failed_action() {
        let script = SessionScript {
            start_date: Some(NaiveDate::MAX),
            actions: vec![
                ScriptAction::AdvanceDays { days: 1 },
                ScriptAction::AddTransaction {
                    kind: TransactionKind::Income,
                    amount: AmountInput::Integer(10),
                    category: "Salário".into(),
                    description: None,
                },
            ],
            ..SessionScript::default()
        };

        let result = replay(&script, Settings::default(), start());
        assert_eq!(result.applied, 1);
        assert_eq!(result.errors(), 1);
        assert!(result.error_messages[&1].contains("Cannot advance"));
        assert_eq!(result.session.today(), NaiveDate::MAX);
    }

    #[test]
    fn test_oversized_amounts_are_rejected() {
        let script = SessionScript::from_json(
            r#"{"actions": [
                {"action": "add_goal", "name": "Reserva", "target": 1000},
                {"action": "contribute", "goal": "Reserva", "amount": "92233720368547757"},
                {"action": "add_transaction", "kind": "income", "amount": "92233720368547757", "category": "Salário"}
            ]}"#,
        )
        .unwrap();

        let result = replay(&script, Settings::default(), start());
        assert_eq!(result.applied, 1);
        assert_eq!(result.errors(), 2);
        assert!(result.error_messages[&2].contains("maximum"));
        assert!(result.session.ledger().is_empty());
        let goal = result.session.goals().find_by_name("Reserva").unwrap();
        assert!(goal.current_amount.is_zero());
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"start_date": "2025-01-02", "actions": [{{"action": "advance_days", "days": 2}}]}}"#
        )
        .unwrap();

        let script = SessionScript::load(file.path()).unwrap();
        assert_eq!(script.start_date, NaiveDate::from_ymd_opt(2025, 1, 2));
        assert_eq!(script.actions, vec![ScriptAction::AdvanceDays { days: 2 }]);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let err = SessionScript::from_yaml("actions:\n  - action: delete_everything\n").unwrap_err();
        assert!(matches!(err, FinanceError::Yaml(_)));
    }
}
