//! Achievement catalog
//!
//! Achievements are one-way flags: once unlocked they stay unlocked for the
//! rest of the session.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an entry in the fixed achievement catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    /// Record the first transaction
    FirstStep,
    /// Save a configured amount within one calendar month
    Saver,
    /// Complete a savings goal
    GoalReached,
    /// Use the app on consecutive days
    Disciplined,
}

impl AchievementId {
    pub fn all() -> &'static [AchievementId] {
        &[
            Self::FirstStep,
            Self::Saver,
            Self::GoalReached,
            Self::Disciplined,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstStep => "Primeiro Passo",
            Self::Saver => "Poupador",
            Self::GoalReached => "Meta Alcançada",
            Self::Disciplined => "Disciplinado",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::FirstStep => "Registre sua primeira transação",
            Self::Saver => "Economize R$ 500 em um mês",
            Self::GoalReached => "Complete sua primeira meta financeira",
            Self::Disciplined => "Use o app por 7 dias consecutivos",
        }
    }

    pub fn icon(&self) -> AchievementIcon {
        match self {
            Self::FirstStep => AchievementIcon::CheckCircle,
            Self::Saver => AchievementIcon::PiggyBank,
            Self::GoalReached => AchievementIcon::Trophy,
            Self::Disciplined => AchievementIcon::Award,
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementIcon {
    CheckCircle,
    PiggyBank,
    Trophy,
    Award,
}

/// A catalog entry together with its unlock state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub icon: AchievementIcon,
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_on: Option<NaiveDate>,
}

impl Achievement {
    pub fn locked(id: AchievementId) -> Self {
        Self {
            id,
            name: id.name().to_string(),
            description: id.description().to_string(),
            icon: id.icon(),
            unlocked: false,
            unlocked_on: None,
        }
    }

    /// Flip the flag. Returns `true` only on the locked -> unlocked transition.
    pub fn unlock(&mut self, on: NaiveDate) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        self.unlocked_on = Some(on);
        true
    }
}

/// The four predefined achievements, all locked
pub fn catalog() -> Vec<Achievement> {
    AchievementId::all()
        .iter()
        .copied()
        .map(Achievement::locked)
        .collect()
}
