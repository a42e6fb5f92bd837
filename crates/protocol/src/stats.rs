//! Derived, read-only views over the engine state.
//!
//! Nothing here is stored: every value is recomputed from the tasks and the
//! player record on demand.

use serde::Serialize;

use crate::engine::ProgressionEngine;
use crate::player::XP_PER_LEVEL;
use crate::rank::Rank;
use crate::task::Task;

/// Fraction of tasks that are completed, in `[0, 1]`; zero with no tasks.
///
/// # Examples
///
/// ```
/// use hunter_protocol::stats::completion_rate;
///
/// assert_eq!(completion_rate(&[]), 0.0);
/// ```
#[must_use]
pub fn completion_rate(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|t| t.completed).count();
    completed as f64 / tasks.len() as f64
}

/// The hunter rank shown for a level.
#[must_use]
pub const fn rank_label(level: u32) -> Rank {
    Rank::for_level(level)
}

/// Progress through the current level, in `[0, 1)`.
///
/// # Examples
///
/// ```
/// use hunter_protocol::stats::xp_progress_fraction;
///
/// assert_eq!(xp_progress_fraction(0), 0.0);
/// assert_eq!(xp_progress_fraction(250), 0.25);
/// ```
#[must_use]
pub fn xp_progress_fraction(xp: u32) -> f64 {
    f64::from(xp % XP_PER_LEVEL) / f64::from(XP_PER_LEVEL)
}

/// Snapshot of everything the player dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub xp_progress_fraction: f64,
    pub rank: Rank,
    pub streak: u32,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub active_tasks: usize,
    pub completion_rate: f64,
    /// Total minutes logged across all tasks.
    pub minutes_logged: u64,
}

impl PlayerStats {
    /// Computes the dashboard values for an engine.
    #[must_use]
    pub fn compute(engine: &ProgressionEngine) -> Self {
        let player = engine.player();
        let tasks = engine.tasks();
        let completed_tasks = tasks.iter().filter(|t| t.completed).count();

        Self {
            level: player.level,
            xp: player.xp,
            xp_to_next_level: player.xp_to_next_level(),
            xp_progress_fraction: xp_progress_fraction(player.xp),
            rank: rank_label(player.level),
            streak: player.streak,
            total_tasks: tasks.len(),
            completed_tasks,
            active_tasks: tasks.len() - completed_tasks,
            completion_rate: completion_rate(tasks),
            minutes_logged: tasks.iter().map(|t| t.time_spent_minutes).sum(),
        }
    }
}
