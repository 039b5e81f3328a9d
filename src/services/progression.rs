//! Progression engine
//!
//! Converts activity into XP and levels, and evaluates the achievement rule
//! table against the current transactions and goals.
//!
//! The engine remembers the last announced level, so a level-up is reported
//! exactly once per recompute no matter how many boundaries the XP jump
//! crosses. Achievements only ever move from locked to unlocked.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::GamificationSettings;
use crate::models::{
    catalog, level_for_xp, Achievement, AchievementId, Goal, LevelUp, Money, ProgressionState,
};
use crate::services::ledger::{Ledger, MonthlyNet};

/// What changed after a transaction was recorded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressionUpdate {
    pub xp_gained: u64,
    pub level_up: Option<LevelUp>,
    pub unlocked: Vec<AchievementId>,
}

#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    settings: GamificationSettings,
    state: ProgressionState,
    achievements: Vec<Achievement>,
}

impl ProgressionEngine {
    pub fn new(settings: GamificationSettings) -> Self {
        Self {
            settings,
            state: ProgressionState::default(),
            achievements: catalog(),
        }
    }

    pub fn state(&self) -> ProgressionState {
        self.state
    }

    pub fn xp(&self) -> u64 {
        self.state.xp
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn settings(&self) -> &GamificationSettings {
        &self.settings
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.achievements
            .iter()
            .any(|a| a.id == id && a.unlocked)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// XP within the current level as a percentage
    pub fn level_progress(&self) -> f64 {
        self.state.level_progress(self.settings.xp_per_level)
    }

    /// Reward a recorded transaction: add XP, recompute the level and
    /// evaluate achievements against the whole ledger
    pub fn on_transaction_added(
        &mut self,
        ledger: &Ledger,
        goals: &[Goal],
        today: NaiveDate,
    ) -> ProgressionUpdate {
        let xp_gained = self.settings.xp_per_transaction;
        let level_up = self.award_xp(xp_gained);
        let unlocked = self.check_achievements(ledger, goals, today);

        ProgressionUpdate {
            xp_gained,
            level_up,
            unlocked,
        }
    }

    /// Add XP and recompute the level
    pub fn award_xp(&mut self, amount: u64) -> Option<LevelUp> {
        self.state.xp = self.state.xp.saturating_add(amount);
        debug!(xp = self.state.xp, gained = amount, "xp awarded");
        self.recompute_level()
    }

    /// Compare the level derived from XP with the stored level
    ///
    /// Returns a single event when the derived level is higher, then stores
    /// it. Never moves the level backwards.
    pub fn recompute_level(&mut self) -> Option<LevelUp> {
        let computed = level_for_xp(self.state.xp, self.settings.xp_per_level);
        if computed <= self.state.level {
            return None;
        }

        let event = LevelUp {
            from: self.state.level,
            to: computed,
        };
        self.state.level = computed;
        info!(from = event.from, to = event.to, "level up");
        Some(event)
    }

    /// Evaluate every rule and unlock the satisfied ones
    ///
    /// Returns only the achievements that were locked before this call.
    pub fn check_achievements(
        &mut self,
        ledger: &Ledger,
        goals: &[Goal],
        today: NaiveDate,
    ) -> Vec<AchievementId> {
        let mut newly_unlocked = Vec::new();

        for achievement in self.achievements.iter_mut().filter(|a| !a.unlocked) {
            if rule_satisfied(achievement.id, &self.settings, ledger, goals)
                && achievement.unlock(today)
            {
                info!(achievement = %achievement.id, "achievement unlocked");
                newly_unlocked.push(achievement.id);
            }
        }

        newly_unlocked
    }
}

fn rule_satisfied(
    id: AchievementId,
    settings: &GamificationSettings,
    ledger: &Ledger,
    goals: &[Goal],
) -> bool {
    match id {
        AchievementId::FirstStep => !ledger.is_empty(),
        AchievementId::Saver => best_monthly_savings(ledger) >= settings.monthly_savings_target,
        AchievementId::GoalReached => goals.iter().any(Goal::is_complete),
        AchievementId::Disciplined => longest_streak(&ledger.activity_days()) >= settings.streak_days,
    }
}

/// Highest income-minus-expenses total over any calendar month
pub fn best_monthly_savings(ledger: &Ledger) -> Money {
    ledger
        .monthly_totals()
        .iter()
        .map(MonthlyNet::net)
        .max()
        .unwrap_or_default()
}

/// Longest run of consecutive calendar days in a sorted, distinct list
pub fn longest_streak(days: &[NaiveDate]) -> u32 {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        current = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(day);
    }

    longest
}

/// Consecutive-day run ending on the most recent day of a sorted, distinct list
pub fn daily_streak(days: &[NaiveDate]) -> u32 {
    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;

    for &day in days.iter().rev() {
        match expected {
            Some(e) if e != day => break,
            _ => {}
        }
        streak += 1;
        expected = day.pred_opt();
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalIcon, TransactionKind};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn expense(ledger: &mut Ledger, cents: i64, date: NaiveDate) {
        ledger
            .add_transaction(
                TransactionKind::Expense,
                Money::from_cents(cents),
                "Alimentação",
                None,
                date,
            )
            .unwrap();
    }

    fn income(ledger: &mut Ledger, cents: i64, date: NaiveDate) {
        ledger
            .add_transaction(
                TransactionKind::Income,
                Money::from_cents(cents),
                "Salário",
                None,
                date,
            )
            .unwrap();
    }

    fn expenses_on(days: &[u32]) -> Ledger {
        let mut ledger = Ledger::new();
        for &d in days {
            expense(&mut ledger, 100, day(d));
        }
        ledger
    }

    fn engine() -> ProgressionEngine {
        ProgressionEngine::new(GamificationSettings::default())
    }

    #[test]
    fn test_transaction_awards_fixed_xp() {
        let mut engine = engine();
        let ledger = expenses_on(&[1]);
        let update = engine.on_transaction_added(&ledger, &[], day(1));
        assert_eq!(update.xp_gained, 10);
        assert_eq!(engine.xp(), 10);
        assert_eq!(engine.level(), 1);
        assert_eq!(update.level_up, None);
    }

    #[test]
    fn test_crossing_boundary_fires_once() {
        let mut engine = engine();
        assert_eq!(engine.award_xp(95), None);
        assert_eq!(engine.award_xp(10), Some(LevelUp { from: 1, to: 2 }));
        assert_eq!(engine.recompute_level(), None);
        assert_eq!(engine.level(), 2);
    }

    #[test]
    fn test_large_jump_is_one_event() {
        let mut engine = engine();
        assert_eq!(engine.award_xp(250), Some(LevelUp { from: 1, to: 3 }));
        assert_eq!(engine.recompute_level(), None);
        assert_eq!(engine.level(), 3);
        assert_eq!(engine.level_progress(), 50.0);
    }

    #[test]
    fn test_ten_transactions_reach_level_two() {
        let mut engine = engine();
        let mut ledger = Ledger::new();
        let mut level_ups = Vec::new();
        for _ in 0..10 {
            expense(&mut ledger, 100, day(1));
            if let Some(event) = engine.on_transaction_added(&ledger, &[], day(1)).level_up {
                level_ups.push(event);
            }
        }
        assert_eq!(level_ups, vec![LevelUp { from: 1, to: 2 }]);
    }

    #[test]
    fn test_first_step_unlocks_exactly_once() {
        let mut engine = engine();
        let mut ledger = Ledger::new();
        assert!(engine.check_achievements(&ledger, &[], day(1)).is_empty());

        expense(&mut ledger, 100, day(1));
        let update = engine.on_transaction_added(&ledger, &[], day(1));
        assert_eq!(update.unlocked, vec![AchievementId::FirstStep]);

        expense(&mut ledger, 100, day(1));
        let update = engine.on_transaction_added(&ledger, &[], day(1));
        assert!(update.unlocked.is_empty());
        assert!(engine.check_achievements(&ledger, &[], day(2)).is_empty());
        assert!(engine.is_unlocked(AchievementId::FirstStep));
        assert_eq!(engine.unlocked_count(), 1);
    }

    #[test]
    fn test_saver_requires_savings_within_one_month() {
        let mut engine = engine();
        let june = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let mut ledger = Ledger::new();
        income(&mut ledger, 30_000, june);
        income(&mut ledger, 30_000, day(1));
        let unlocked = engine.check_achievements(&ledger, &[], day(1));
        assert!(!unlocked.contains(&AchievementId::Saver));

        let mut ledger = Ledger::new();
        income(&mut ledger, 80_000, day(1));
        expense(&mut ledger, 30_000, day(2));
        let unlocked = engine.check_achievements(&ledger, &[], day(2));
        assert!(unlocked.contains(&AchievementId::Saver));
    }

    #[test]
    fn test_goal_reached_rule() {
        let mut engine = engine();
        let ledger = Ledger::new();
        let mut goal = Goal::new("Viagem", Money::from_cents(1_000), None, GoalIcon::Plane);
        assert!(!engine
            .check_achievements(&ledger, std::slice::from_ref(&goal), day(1))
            .contains(&AchievementId::GoalReached));

        goal.current_amount = Money::from_cents(1_000);
        assert_eq!(
            engine.check_achievements(&ledger, &[goal], day(1)),
            vec![AchievementId::GoalReached]
        );
    }

    #[test]
    fn test_disciplined_requires_consecutive_days() {
        let mut engine = engine();
        let gapped = expenses_on(&[1, 2, 3, 5, 6, 7, 8]);
        assert!(!engine
            .check_achievements(&gapped, &[], day(8))
            .contains(&AchievementId::Disciplined));

        let week = expenses_on(&[10, 11, 12, 13, 14, 15, 16]);
        assert!(engine
            .check_achievements(&week, &[], day(16))
            .contains(&AchievementId::Disciplined));
    }

    #[test]
    fn test_streak_helpers() {
        assert_eq!(longest_streak(&[]), 0);
        assert_eq!(longest_streak(&[day(1), day(2), day(4), day(5), day(6)]), 3);

        let ledger = expenses_on(&[1, 2, 4, 5, 5, 6]);
        assert_eq!(daily_streak(&ledger.activity_days()), 3);
        assert_eq!(daily_streak(&[]), 0);
    }

    #[test]
    fn test_best_monthly_savings() {
        let june = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let mut ledger = Ledger::new();
        income(&mut ledger, 10_000, june);
        income(&mut ledger, 50_000, day(1));
        expense(&mut ledger, 5_000, day(2));
        assert_eq!(best_monthly_savings(&ledger), Money::from_cents(45_000));
        assert_eq!(best_monthly_savings(&Ledger::new()), Money::zero());
    }
}
