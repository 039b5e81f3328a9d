//! Savings goal model
//!
//! A goal is a named target amount that the user funds through manual
//! contributions. Contributions are not capped, so a goal can be over-funded.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::Money;

/// Icon tag shown next to a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalIcon {
    #[default]
    Target,
    Plane,
    Car,
    Home,
    PiggyBank,
}

impl GoalIcon {
    pub fn all() -> &'static [GoalIcon] {
        &[
            Self::Target,
            Self::Plane,
            Self::Car,
            Self::Home,
            Self::PiggyBank,
        ]
    }

    /// Short label suitable for terminal output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Target => "target",
            Self::Plane => "travel",
            Self::Car => "car",
            Self::Home => "home",
            Self::PiggyBank => "savings",
        }
    }
}

impl fmt::Display for GoalIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,

    pub name: String,

    /// Amount the user wants to reach (always positive)
    pub target_amount: Money,

    /// Amount contributed so far (never negative, may exceed the target)
    pub current_amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    #[serde(default)]
    pub icon: GoalIcon,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        name: impl Into<String>,
        target_amount: Money,
        deadline: Option<NaiveDate>,
        icon: GoalIcon,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            name: name.into().trim().to_string(),
            target_amount,
            current_amount: Money::zero(),
            deadline,
            icon,
            created_at: now,
            updated_at: now,
        }
    }

    /// Progress toward the target as a percentage, unbounded above 100
    ///
    /// A zero target yields 0.0 rather than dividing by zero.
    pub fn progress_ratio(&self) -> f64 {
        self.current_amount.percent_of(self.target_amount)
    }

    /// Whether the contributions have reached the target
    pub fn is_complete(&self) -> bool {
        self.target_amount.is_positive() && self.current_amount >= self.target_amount
    }

    /// Amount still missing to reach the target (zero once complete)
    pub fn remaining(&self) -> Money {
        if self.current_amount >= self.target_amount {
            Money::zero()
        } else {
            self.target_amount - self.current_amount
        }
    }

    /// Whether the deadline has passed without completing the goal
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.deadline {
            Some(deadline) => today > deadline && !self.is_complete(),
            None => false,
        }
    }

    /// Add a contribution. Callers validate that `amount` is positive.
    ///
    /// Leaves the goal unchanged when the balance would overflow.
    pub(crate) fn add_contribution(&mut self, amount: Money) -> Result<(), GoalValidationError> {
        self.current_amount = self
            .current_amount
            .checked_add(amount)
            .ok_or(GoalValidationError::BalanceOverflow)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.is_empty() {
            return Err(GoalValidationError::MissingName);
        }

        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget(self.target_amount));
        }

        if self.target_amount.exceeds_max() {
            return Err(GoalValidationError::TargetTooLarge(self.target_amount));
        }

        if self.current_amount.is_negative() {
            return Err(GoalValidationError::NegativeBalance(self.current_amount));
        }

        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} / {} ({:.0}%)",
            self.name,
            self.current_amount,
            self.target_amount,
            self.progress_ratio()
        )
    }
}

/// Validation errors for goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    MissingName,
    NonPositiveTarget(Money),
    TargetTooLarge(Money),
    NegativeBalance(Money),
    BalanceOverflow,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "Goal name is required"),
            Self::NonPositiveTarget(amount) => {
                write!(f, "Goal target must be a positive number, got {}", amount)
            }
            Self::TargetTooLarge(amount) => {
                write!(f, "Goal target {} exceeds the maximum of {}", amount, Money::MAX_AMOUNT)
            }
            Self::NegativeBalance(amount) => {
                write!(f, "Goal balance cannot be negative, got {}", amount)
            }
            Self::BalanceOverflow => write!(f, "Goal balance would exceed the supported range"),
        }
    }
}

impl std::error::Error for GoalValidationError {}
