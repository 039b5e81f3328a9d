//! Session state
//!
//! A [`Session`] owns everything one signed-in user works with: the ledger,
//! the goal tracker, the progression engine and a queue of pending events.
//! Every mutation goes through the session so that progression is always
//! recomputed against the current data.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut session = Session::new(Settings::default(), Arc::new(SystemClock));
//! session.add_transaction(TransactionKind::Income, Money::from_cents(20_000), "Salário", None)?;
//! for event in session.take_events() {
//!     println!("{}", event.to_notification());
//! }
//! ```

pub mod events;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::Settings;
use crate::error::FinanceResult;
use crate::models::{Goal, GoalIcon, GoalId, Money, Transaction, TransactionKind, User};
use crate::services::{GoalTracker, InsightGenerator, Ledger, ProgressionEngine, ProgressionUpdate};

pub use events::{Notification, NotificationType, SessionEvent};

pub struct Session {
    user: Option<User>,
    settings: Settings,
    clock: Arc<dyn Clock>,
    ledger: Ledger,
    goals: GoalTracker,
    progression: ProgressionEngine,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(settings: Settings, clock: Arc<dyn Clock>) -> Self {
        let progression = ProgressionEngine::new(settings.gamification.clone());
        Self {
            user: None,
            settings,
            clock,
            ledger: Ledger::new(),
            goals: GoalTracker::new(),
            progression,
            events: Vec::new(),
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.sign_in(user);
        self
    }

    pub fn sign_in(&mut self, user: User) {
        info!(user = %user.id, "session started");
        self.user = Some(user);
    }

    /// End the session's identity; recorded data stays in memory
    pub fn sign_out(&mut self) -> Option<User> {
        let user = self.user.take();
        if let Some(u) = &user {
            info!(user = %u.id, "session ended");
        }
        user
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn goals(&self) -> &GoalTracker {
        &self.goals
    }

    pub fn progression(&self) -> &ProgressionEngine {
        &self.progression
    }

    pub fn insights(&self) -> InsightGenerator<'_> {
        InsightGenerator::new(&self.ledger, &self.settings.insights)
    }

    /// Record a transaction dated today and reward it
    pub fn add_transaction(
        &mut self,
        kind: TransactionKind,
        amount: Money,
        category: &str,
        description: Option<String>,
    ) -> FinanceResult<Transaction> {
        let today = self.clock.today();
        let txn = self
            .ledger
            .add_transaction(kind, amount, category, description, today)?;

        self.events.push(SessionEvent::TransactionAdded {
            id: txn.id,
            kind: txn.kind,
            amount: txn.amount,
        });

        let update =
            self.progression
                .on_transaction_added(&self.ledger, self.goals.goals(), today);
        self.record_progression(update);

        Ok(txn)
    }

    /// Same as [`Self::add_transaction`] for a user-entered amount string
    pub fn add_transaction_str(
        &mut self,
        kind: TransactionKind,
        amount: &str,
        category: &str,
        description: Option<String>,
    ) -> FinanceResult<Transaction> {
        let amount = Ledger::parse_amount(amount)?;
        self.add_transaction(kind, amount, category, description)
    }

    pub fn add_goal(
        &mut self,
        name: &str,
        target_amount: Money,
        deadline: Option<NaiveDate>,
        icon: GoalIcon,
    ) -> FinanceResult<Goal> {
        let goal = self.goals.add_goal(name, target_amount, deadline, icon)?;
        self.events.push(SessionEvent::GoalCreated {
            id: goal.id,
            name: goal.name.clone(),
        });
        Ok(goal)
    }

    /// Contribute to a goal, then re-check achievements for completion
    pub fn contribute(&mut self, goal_id: GoalId, amount: Money) -> FinanceResult<Goal> {
        let goal = self.goals.contribute(goal_id, amount)?;
        self.events.push(SessionEvent::GoalContributed {
            id: goal.id,
            name: goal.name.clone(),
            amount,
            progress: goal.progress_ratio(),
        });

        let today = self.clock.today();
        let unlocked =
            self.progression
                .check_achievements(&self.ledger, self.goals.goals(), today);
        self.record_progression(ProgressionUpdate {
            unlocked,
            ..ProgressionUpdate::default()
        });

        Ok(goal)
    }

    pub fn contribute_by_name(&mut self, goal_name: &str, amount: Money) -> FinanceResult<Goal> {
        let goal_id = self.goals.find_by_name(goal_name)?.id;
        self.contribute(goal_id, amount)
    }

    fn record_progression(&mut self, update: ProgressionUpdate) {
        if let Some(level_up) = update.level_up {
            self.events.push(SessionEvent::LevelUp(level_up));
        }
        for id in update.unlocked {
            self.events.push(SessionEvent::AchievementUnlocked { id });
        }
        debug!(pending = self.events.len(), "session events queued");
    }

    /// Events not yet shown to the user
    pub fn pending_events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Drain the event queue
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
