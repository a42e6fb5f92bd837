//! Task-related types for the progression engine.
//!
//! This module defines the core task types used throughout the hunter
//! application: task and subtask identifiers, the [`Subtask`] checklist item
//! and the [`Task`] ("dungeon") itself.
//!
//! Tasks are plain data. Every mutation that must keep the progress, XP and
//! level invariants goes through [`ProgressionEngine`](crate::ProgressionEngine);
//! the helpers here only cover the per-task part of those rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rank::Rank;

/// Unique identifier for a task.
///
/// Uses UUID v4 for globally unique identification.
pub type TaskId = uuid::Uuid;

/// Unique identifier for a subtask ("objective").
pub type SubtaskId = uuid::Uuid;

/// Estimated effort assigned to new tasks, in minutes.
pub const DEFAULT_ESTIMATED_MINUTES: u32 = 60;

/// Lower bound of a task's progress percentage.
pub const MIN_PROGRESS: f64 = 0.0;
/// Upper bound of a task's progress percentage.
pub const MAX_PROGRESS: f64 = 100.0;

/// A checklist item within a task.
///
/// # Examples
///
/// ```
/// use hunter_protocol::Subtask;
///
/// let subtask = Subtask::new("Study hooks architecture");
/// assert!(!subtask.completed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Unique identifier for this subtask.
    pub id: SubtaskId,
    /// What needs to be done.
    pub title: String,
    /// Whether the objective has been ticked off.
    pub completed: bool,
}

impl Subtask {
    /// Creates a new, incomplete subtask.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: SubtaskId::new_v4(),
            title: title.into(),
            completed: false,
        }
    }
}

/// A dungeon: a unit of work with a difficulty rank and an XP reward.
///
/// # Examples
///
/// ```
/// use hunter_protocol::{Rank, Task};
///
/// let task = Task::new("Daily Combat Training", "Strength work", Rank::C, "Training Ground");
/// assert_eq!(task.reward_xp, 50);
/// assert_eq!(task.progress, 0.0);
/// assert!(!task.completed);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for this task.
    pub id: TaskId,
    /// Short summary of the task.
    pub title: String,
    /// Detailed description of what needs to be done.
    #[serde(default)]
    pub description: String,
    /// Difficulty tier, fixed at creation.
    pub rank: Rank,
    /// Free-form grouping label.
    #[serde(default)]
    pub category: String,
    /// Whether the dungeon has been cleared.
    pub completed: bool,
    /// Experience granted on completion, frozen at creation.
    pub reward_xp: u32,
    /// Completion percentage in `[0, 100]`.
    pub progress: f64,
    /// Objectives in display order.
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Accumulated time spent, in minutes.
    #[serde(default)]
    pub time_spent_minutes: u64,
    /// Estimated effort, in minutes.
    #[serde(default = "default_estimated_minutes")]
    pub estimated_minutes: u32,
    /// When this task was created.
    pub created_at: DateTime<Utc>,
    /// Manual progress captured when the task was completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) progress_before_completion: Option<f64>,
}

fn default_estimated_minutes() -> u32 {
    DEFAULT_ESTIMATED_MINUTES
}

impl Task {
    /// Creates a new task.
    ///
    /// The reward is looked up from `rank` once and stored on the task.
    /// Progress starts at zero with no subtasks and no logged time.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        rank: Rank,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: TaskId::new_v4(),
            title: title.into(),
            description: description.into(),
            rank,
            category: category.into(),
            completed: false,
            reward_xp: rank.reward_xp(),
            progress: MIN_PROGRESS,
            subtasks: Vec::new(),
            time_spent_minutes: 0,
            estimated_minutes: DEFAULT_ESTIMATED_MINUTES,
            created_at: Utc::now(),
            progress_before_completion: None,
        }
    }

    /// Returns `true` if progress is driven by the subtask checklist.
    #[must_use]
    pub fn is_progress_derived(&self) -> bool {
        !self.subtasks.is_empty()
    }

    /// Returns the number of completed subtasks.
    #[must_use]
    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }

    /// Returns the subtask-derived progress, or `None` when there are no subtasks.
    ///
    /// # Examples
    ///
    /// ```
    /// use hunter_protocol::{Rank, Subtask, Task};
    ///
    /// let mut task = Task::new("Quest", "", Rank::E, "General");
    /// assert_eq!(task.subtask_progress(), None);
    ///
    /// task.subtasks.push(Subtask::new("one"));
    /// task.subtasks.push(Subtask::new("two"));
    /// task.subtasks[0].completed = true;
    /// assert_eq!(task.subtask_progress(), Some(50.0));
    /// ```
    #[must_use]
    pub fn subtask_progress(&self) -> Option<f64> {
        if self.subtasks.is_empty() {
            return None;
        }
        let done = self.completed_subtasks() as f64;
        let total = self.subtasks.len() as f64;
        Some(MAX_PROGRESS * done / total)
    }

    /// Looks up a subtask by id.
    #[must_use]
    pub fn subtask(&self, id: SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == id)
    }

    /// Minutes left against the estimate, zero once the estimate is exceeded.
    #[must_use]
    pub fn remaining_minutes(&self) -> u64 {
        u64::from(self.estimated_minutes).saturating_sub(self.time_spent_minutes)
    }

    /// Re-derives progress from subtasks, if any.
    pub(crate) fn sync_progress(&mut self) {
        if let Some(derived) = self.subtask_progress() {
            self.progress = derived;
        }
    }

    /// Restores the task invariants after loading it from storage.
    ///
    /// Clamps progress into range and re-derives it when subtasks exist.
    pub(crate) fn normalize(&mut self) {
        self.progress = clamp_progress(self.progress);
        self.sync_progress();
    }
}

/// Clamps a progress value into `[0, 100]`, mapping NaN to zero.
pub(crate) fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        MIN_PROGRESS
    } else {
        value.clamp(MIN_PROGRESS, MAX_PROGRESS)
    }
}
