//! The progression engine.
//!
//! [`ProgressionEngine`] owns the task collection and the player record and
//! is the only way to mutate either. Every operation runs to completion
//! synchronously and leaves these invariants intact:
//!
//! - `0 <= progress <= 100` for every task
//! - a task with subtasks has `progress == 100 * done / total`
//! - a task's `reward_xp` never changes after creation
//! - `level == xp / XP_PER_LEVEL + 1`
//!
//! [`SharedEngine`] wraps an engine in a single mutex for callers that need to
//! reach it from more than one thread.
//!
//! # Examples
//!
//! ```
//! use hunter_protocol::{ProgressionEngine, Rank};
//!
//! let mut engine = ProgressionEngine::new();
//! let task = engine.register_task("Clear the gate", "", Rank::B, "General").unwrap();
//!
//! let completion = engine.complete_task(task.id).unwrap();
//! assert_eq!(completion.xp_gained, 100);
//! assert_eq!(engine.player().xp, 100);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{ProtocolError, Result};
use crate::player::PlayerProgression;
use crate::rank::Rank;
use crate::task::{MIN_PROGRESS, MAX_PROGRESS, Subtask, SubtaskId, Task, TaskId, clamp_progress};

/// Result of [`ProgressionEngine::complete_task`].
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The task after the operation.
    pub task: Task,
    /// Experience added to the player; zero when the task was already cleared.
    pub xp_gained: u32,
    /// The level reached, when this completion raised the player's level.
    pub level_up: Option<u32>,
    /// Whether the task was already cleared before the call.
    pub already_completed: bool,
}

impl Completion {
    /// Returns `true` if the call changed nothing because the task was
    /// already completed.
    #[must_use]
    pub fn was_noop(&self) -> bool {
        self.already_completed
    }
}

/// Owner of the task collection and the player's progression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressionEngine {
    tasks: Vec<Task>,
    player: PlayerProgression,
}

impl ProgressionEngine {
    /// Creates an engine with no tasks and a fresh level-1 player.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an engine from persisted parts.
    ///
    /// Task order is kept as given (most recent first). Progress values are
    /// clamped and re-derived from subtasks, and the player's level is
    /// recomputed from experience.
    #[must_use]
    pub fn from_parts(mut tasks: Vec<Task>, mut player: PlayerProgression) -> Self {
        for task in &mut tasks {
            task.normalize();
        }
        let stored_level = player.level;
        if player.normalize() {
            warn!(
                stored_level,
                level = player.level,
                xp = player.xp,
                "stored level did not match experience, recomputed"
            );
        }
        Self { tasks, player }
    }

    /// All tasks, most recently registered first.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The player's progression record.
    #[must_use]
    pub fn player(&self) -> &PlayerProgression {
        &self.player
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks that are not yet cleared, in display order.
    pub fn active_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.completed)
    }

    /// Cleared tasks, in display order.
    pub fn cleared_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.completed)
    }

    /// Sets the externally maintained activity streak.
    pub fn set_streak(&mut self, streak: u32) {
        self.player.streak = streak;
    }

    /// Registers a new task at the front of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidInput`] if the title is blank.
    pub fn register_task(
        &mut self,
        title: &str,
        description: &str,
        rank: Rank,
        category: &str,
    ) -> Result<Task> {
        let title = require_text(title, "task title")?;
        let task = Task::new(title, description.trim(), rank, category.trim());
        debug!(id = %task.id, %rank, reward_xp = task.reward_xp, "registered task");
        self.tasks.insert(0, task.clone());
        Ok(task)
    }

    /// Marks a task as cleared and awards its experience.
    ///
    /// Completing an already cleared task changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::TaskNotFound`] for an unknown id.
    pub fn complete_task(&mut self, id: TaskId) -> Result<Completion> {
        let task = find_mut(&mut self.tasks, id)?;
        if task.completed {
            debug!(%id, "task already completed");
            return Ok(Completion {
                task: task.clone(),
                xp_gained: 0,
                level_up: None,
                already_completed: true,
            });
        }

        task.completed = true;
        if !task.is_progress_derived() {
            task.progress_before_completion = Some(task.progress);
            task.progress = MAX_PROGRESS;
        }
        let reward = task.reward_xp;
        let task = task.clone();

        let level_up = self.player.gain(reward);
        info!(%id, xp_gained = reward, xp = self.player.xp, level = self.player.level, "task completed");
        if let Some(level) = level_up {
            info!(level, "level up");
        }

        Ok(Completion {
            task,
            xp_gained: reward,
            level_up,
            already_completed: false,
        })
    }

    /// Reopens a cleared task and takes its experience back.
    ///
    /// Experience is floored at zero and the level may go down. Progress is
    /// re-derived from subtasks, or restored to the value it had before the
    /// task was completed. Reopening an open task changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::TaskNotFound`] for an unknown id.
    pub fn uncomplete_task(&mut self, id: TaskId) -> Result<Task> {
        let task = find_mut(&mut self.tasks, id)?;
        if !task.completed {
            debug!(%id, "task is not completed");
            return Ok(task.clone());
        }

        task.completed = false;
        let restored = task.progress_before_completion.take().unwrap_or(MIN_PROGRESS);
        task.progress = clamp_progress(restored);
        task.sync_progress();
        let reward = task.reward_xp;
        let task = task.clone();

        let removed = self.player.lose(reward);
        info!(%id, xp_removed = removed, xp = self.player.xp, level = self.player.level, "task reopened");
        Ok(task)
    }

    /// Sets a task's progress by hand, clamping it into `[0, 100]`.
    ///
    /// On a cleared task the value is also what reopening it restores.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::TaskNotFound`] for an unknown id
    /// - [`ProtocolError::InvalidInput`] for a non-finite value
    /// - [`ProtocolError::ProgressDerivedFromSubtasks`] if the task has subtasks
    pub fn set_progress(&mut self, id: TaskId, value: f64) -> Result<Task> {
        let task = find_mut(&mut self.tasks, id)?;
        if !value.is_finite() {
            return Err(ProtocolError::InvalidInput(format!(
                "progress must be a finite number, got {value}"
            )));
        }
        if task.is_progress_derived() {
            return Err(ProtocolError::ProgressDerivedFromSubtasks(id));
        }

        let clamped = value.clamp(MIN_PROGRESS, MAX_PROGRESS);
        if clamped != value {
            debug!(%id, requested = value, clamped, "progress clamped");
        }
        task.progress = clamped;
        if task.completed {
            task.progress_before_completion = Some(clamped);
        }
        Ok(task.clone())
    }

    /// Appends an objective to a task and re-derives its progress.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::TaskNotFound`] for an unknown id
    /// - [`ProtocolError::InvalidInput`] if the title is blank
    pub fn add_subtask(&mut self, id: TaskId, title: &str) -> Result<Task> {
        let task = find_mut(&mut self.tasks, id)?;
        let title = require_text(title, "objective title")?;

        let subtask = Subtask::new(title);
        debug!(%id, subtask = %subtask.id, "added objective");
        task.subtasks.push(subtask);
        task.sync_progress();
        Ok(task.clone())
    }

    /// Flips an objective's completion flag and re-derives the task's progress.
    ///
    /// The parent task is never completed or reopened by this call.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::TaskNotFound`] for an unknown task id
    /// - [`ProtocolError::SubtaskNotFound`] for an unknown subtask id
    pub fn toggle_subtask(&mut self, id: TaskId, subtask_id: SubtaskId) -> Result<Task> {
        let task = find_mut(&mut self.tasks, id)?;
        let subtask = task
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or(ProtocolError::SubtaskNotFound {
                task: id,
                subtask: subtask_id,
            })?;

        subtask.completed = !subtask.completed;
        debug!(%id, subtask = %subtask_id, completed = subtask.completed, "toggled objective");
        task.sync_progress();
        Ok(task.clone())
    }

    /// Adds time spent on a task.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::TaskNotFound`] for an unknown id
    /// - [`ProtocolError::InvalidInput`] if `minutes` is zero
    pub fn log_time(&mut self, id: TaskId, minutes: u32) -> Result<Task> {
        let task = find_mut(&mut self.tasks, id)?;
        if minutes == 0 {
            return Err(ProtocolError::InvalidInput(
                "logged time must be at least one minute".to_string(),
            ));
        }

        task.time_spent_minutes = task.time_spent_minutes.saturating_add(u64::from(minutes));
        debug!(%id, minutes, total = task.time_spent_minutes, "logged time");
        Ok(task.clone())
    }

    /// Removes a task permanently and returns it.
    ///
    /// Experience earned from the task is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::TaskNotFound`] for an unknown id.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(ProtocolError::TaskNotFound(id))?;
        let task = self.tasks.remove(index);
        info!(%id, completed = task.completed, "task deleted");
        Ok(task)
    }
}

fn find_mut(tasks: &mut [Task], id: TaskId) -> Result<&mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(ProtocolError::TaskNotFound(id))
}

fn require_text<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}

/// A [`ProgressionEngine`] behind a single mutex.
///
/// Tasks and the player record are updated together under one lock, so a
/// completion's progress, experience and level changes are never observed
/// half-applied.
///
/// # Examples
///
/// ```
/// use hunter_protocol::{ProgressionEngine, Rank, SharedEngine};
///
/// let shared = SharedEngine::new(ProgressionEngine::new());
/// let task = shared
///     .with(|engine| engine.register_task("Scout", "", Rank::E, "General"))
///     .unwrap();
/// assert_eq!(shared.snapshot().task(task.id).unwrap().title, "Scout");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<Mutex<ProgressionEngine>>,
}

impl SharedEngine {
    /// Wraps an engine for shared access.
    #[must_use]
    pub fn new(engine: ProgressionEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Runs `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut ProgressionEngine) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ProgressionEngine {
        self.inner.lock().clone()
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::player::level_for_xp;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Register(Rank),
        Complete(usize),
        Uncomplete(usize),
        SetProgress(usize, f64),
        AddSubtask(usize),
        Toggle(usize, usize),
        LogTime(usize, u32),
        Delete(usize),
    }

    fn arb_rank() -> impl Strategy<Value = Rank> {
        prop_oneof![
            Just(Rank::E),
            Just(Rank::D),
            Just(Rank::C),
            Just(Rank::B),
            Just(Rank::A),
            Just(Rank::S),
        ]
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            arb_rank().prop_map(Op::Register),
            any::<usize>().prop_map(Op::Complete),
            any::<usize>().prop_map(Op::Uncomplete),
            (any::<usize>(), -50.0f64..150.0).prop_map(|(i, v)| Op::SetProgress(i, v)),
            any::<usize>().prop_map(Op::AddSubtask),
            (any::<usize>(), any::<usize>()).prop_map(|(i, j)| Op::Toggle(i, j)),
            (any::<usize>(), 0u32..500).prop_map(|(i, m)| Op::LogTime(i, m)),
            any::<usize>().prop_map(Op::Delete),
        ]
    }

    fn pick(engine: &ProgressionEngine, index: usize) -> Option<TaskId> {
        let tasks = engine.tasks();
        (!tasks.is_empty()).then(|| tasks[index % tasks.len()].id)
    }

    fn apply(engine: &mut ProgressionEngine, op: &Op) {
        match *op {
            Op::Register(rank) => {
                engine.register_task("Quest", "", rank, "General").unwrap();
            }
            Op::Complete(i) => {
                if let Some(id) = pick(engine, i) {
                    engine.complete_task(id).unwrap();
                }
            }
            Op::Uncomplete(i) => {
                if let Some(id) = pick(engine, i) {
                    engine.uncomplete_task(id).unwrap();
                }
            }
            Op::SetProgress(i, value) => {
                if let Some(id) = pick(engine, i) {
                    let _ = engine.set_progress(id, value);
                }
            }
            Op::AddSubtask(i) => {
                if let Some(id) = pick(engine, i) {
                    engine.add_subtask(id, "Objective").unwrap();
                }
            }
            Op::Toggle(i, j) => {
                if let Some(id) = pick(engine, i) {
                    let subtasks = &engine.task(id).unwrap().subtasks;
                    if !subtasks.is_empty() {
                        let sub = subtasks[j % subtasks.len()].id;
                        engine.toggle_subtask(id, sub).unwrap();
                    }
                }
            }
            Op::LogTime(i, minutes) => {
                if let Some(id) = pick(engine, i) {
                    let _ = engine.log_time(id, minutes);
                }
            }
            Op::Delete(i) => {
                if let Some(id) = pick(engine, i) {
                    engine.delete_task(id).unwrap();
                }
            }
        }
    }

    fn assert_invariants(engine: &ProgressionEngine) -> std::result::Result<(), TestCaseError> {
        let player = engine.player();
        prop_assert_eq!(player.level, level_for_xp(player.xp));
        for task in engine.tasks() {
            prop_assert!((0.0..=100.0).contains(&task.progress));
            prop_assert_eq!(task.reward_xp, task.rank.reward_xp());
            if let Some(derived) = task.subtask_progress() {
                prop_assert_eq!(task.progress, derived);
            }
        }
        Ok(())
    }

    proptest! {
        /// Tests that every operation sequence keeps the engine invariants.
        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(arb_op(), 0..60)) {
            let mut engine = ProgressionEngine::new();
            for op in &ops {
                apply(&mut engine, op);
                assert_invariants(&engine)?;
            }
        }

        /// Tests that completing twice has the same effect as completing once.
        #[test]
        fn double_complete_matches_single(
            ops in prop::collection::vec(arb_op(), 0..30),
            index in any::<usize>(),
        ) {
            let mut engine = ProgressionEngine::new();
            engine.register_task("Anchor", "", Rank::B, "General").unwrap();
            for op in &ops {
                apply(&mut engine, op);
            }
            if let Some(id) = pick(&engine, index) {
                let mut once = engine.clone();
                once.complete_task(id).unwrap();
                let mut twice = engine.clone();
                twice.complete_task(id).unwrap();
                twice.complete_task(id).unwrap();
                prop_assert_eq!(once, twice);
            }
        }

        /// Tests that experience tracks the completed tasks until deletions.
        #[test]
        fn complete_uncomplete_cycles_never_underflow(
            ranks in prop::collection::vec(arb_rank(), 1..10),
            toggles in prop::collection::vec(any::<usize>(), 0..40),
        ) {
            let mut engine = ProgressionEngine::new();
            for rank in &ranks {
                engine.register_task("Quest", "", *rank, "General").unwrap();
            }
            for t in toggles {
                let id = pick(&engine, t).unwrap();
                if engine.task(id).unwrap().completed {
                    engine.uncomplete_task(id).unwrap();
                } else {
                    engine.complete_task(id).unwrap();
                }
                let expected: u32 = engine.cleared_tasks().map(|t| t.reward_xp).sum();
                prop_assert_eq!(engine.player().xp, expected);
                prop_assert_eq!(engine.player().level, level_for_xp(expected));
            }
        }
    }
}
