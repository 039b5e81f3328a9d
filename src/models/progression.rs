//! Progression state: experience points and level
//!
//! The level is derived from XP but stored alongside it so that a level
//! transition can be detected exactly once.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Level for a given XP total: `floor(xp / xp_per_level) + 1`
///
/// A zero `xp_per_level` is treated as one point per level.
pub fn level_for_xp(xp: u64, xp_per_level: u64) -> u32 {
    let per_level = xp_per_level.max(1);
    let level = xp / per_level + 1;
    u32::try_from(level).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    /// Never decreases
    pub xp: u64,
    /// Last level announced to the user
    pub level: u32,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self { xp: 0, level: 1 }
    }
}

impl ProgressionState {
    /// XP earned inside the current level, as a percentage of the level size
    pub fn level_progress(&self, xp_per_level: u64) -> f64 {
        let per_level = xp_per_level.max(1);
        (self.xp % per_level) as f64 * 100.0 / per_level as f64
    }

    /// XP still needed to reach the next level
    pub fn xp_to_next_level(&self, xp_per_level: u64) -> u64 {
        let per_level = xp_per_level.max(1);
        per_level - self.xp % per_level
    }
}

/// A level transition, emitted once per recompute that crosses a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub from: u32,
    pub to: u32,
}

impl fmt::Display for LevelUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parabéns! Você subiu para o nível {}!", self.to)
    }
}
