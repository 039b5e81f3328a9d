//! Goal tracker service
//!
//! Creates savings goals and applies manual contributions to them.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Goal, GoalIcon, GoalId, Money};

/// Holds the goals of a session in creation order
#[derive(Debug, Clone, Default)]
pub struct GoalTracker {
    goals: Vec<Goal>,
}

impl GoalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a goal with nothing contributed yet
    pub fn add_goal(
        &mut self,
        name: &str,
        target_amount: Money,
        deadline: Option<NaiveDate>,
        icon: GoalIcon,
    ) -> FinanceResult<Goal> {
        let goal = Goal::new(name, target_amount, deadline, icon);

        if let Err(e) = goal.validate() {
            warn!(name, target = target_amount.cents(), "rejected goal: {}", e);
            return Err(FinanceError::Validation(e.to_string()));
        }

        info!(id = %goal.id, name = %goal.name, target = goal.target_amount.cents(), "goal created");
        self.goals.push(goal.clone());
        Ok(goal)
    }

    /// Add `amount` to a goal's balance and return the updated goal
    ///
    /// The amount must be positive and the goal must exist; on failure the
    /// tracker is unchanged. The balance is not capped at the target.
    pub fn contribute(&mut self, goal_id: GoalId, amount: Money) -> FinanceResult<Goal> {
        if !amount.is_positive() {
            warn!(goal = %goal_id, amount = amount.cents(), "rejected contribution");
            return Err(FinanceError::Validation(format!(
                "Contribution must be a positive number, got {}",
                amount
            )));
        }

        if amount.exceeds_max() {
            warn!(goal = %goal_id, amount = amount.cents(), "rejected contribution");
            return Err(FinanceError::Validation(format!(
                "Contribution {} exceeds the maximum of {}",
                amount,
                Money::MAX_AMOUNT
            )));
        }

        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| FinanceError::goal_not_found(goal_id.to_string()))?;

        goal.add_contribution(amount).map_err(|e| {
            warn!(goal = %goal_id, amount = amount.cents(), "rejected contribution: {}", e);
            FinanceError::Validation(e.to_string())
        })?;

        info!(
            goal = %goal.id,
            amount = amount.cents(),
            current = goal.current_amount.cents(),
            "contribution applied"
        );

        Ok(goal.clone())
    }

    /// Progress of a goal as a percentage, unbounded above 100
    pub fn progress_ratio(goal: &Goal) -> f64 {
        goal.progress_ratio()
    }

    pub fn get(&self, goal_id: GoalId) -> FinanceResult<&Goal> {
        self.goals
            .iter()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| FinanceError::goal_not_found(goal_id.to_string()))
    }

    /// Find a goal by name (case-insensitive, first match)
    pub fn find_by_name(&self, name: &str) -> FinanceResult<&Goal> {
        let wanted = name.trim().to_lowercase();
        self.goals
            .iter()
            .find(|g| g.name.to_lowercase() == wanted)
            .ok_or_else(|| FinanceError::goal_not_found(name.trim()))
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn completed_goals(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(|g| g.is_complete())
    }
}
