//! Starter dungeons for a brand-new hunter profile.
//!
//! A profile with nothing stored is seeded with two sample tasks so the
//! dashboard has something to show on first run.
//!
//! # Examples
//!
//! ```
//! use hunter_protocol::seed::seed_tasks;
//!
//! let tasks = seed_tasks();
//! assert_eq!(tasks.len(), 2);
//! assert_eq!(tasks[0].progress, 50.0);
//! ```

use crate::rank::Rank;
use crate::task::{Subtask, Task};

/// Builds a seeded task with optional objectives and logged time.
struct SeedBuilder {
    task: Task,
}

impl SeedBuilder {
    fn new(title: &str, description: &str, rank: Rank, category: &str) -> Self {
        Self {
            task: Task::new(title, description, rank, category),
        }
    }

    /// Appends an objective, already ticked off when `completed` is set.
    fn objective(mut self, title: &str, completed: bool) -> Self {
        let mut subtask = Subtask::new(title);
        subtask.completed = completed;
        self.task.subtasks.push(subtask);
        self
    }

    fn time_spent(mut self, minutes: u64) -> Self {
        self.task.time_spent_minutes = minutes;
        self
    }

    fn estimate(mut self, minutes: u32) -> Self {
        self.task.estimated_minutes = minutes;
        self
    }

    fn build(mut self) -> Task {
        self.task.sync_progress();
        self.task
    }
}

/// The sample dungeons installed into an empty profile, newest first.
#[must_use]
pub fn seed_tasks() -> Vec<Task> {
    vec![
        SeedBuilder::new(
            "Master Advanced React Patterns",
            "Complete comprehensive training in React development",
            Rank::B,
            "Knowledge Dungeon",
        )
        .objective("Study Hooks Architecture", true)
        .objective("Implement Context Patterns", true)
        .objective("Master Performance Optimization", false)
        .objective("Build Advanced Demo Project", false)
        .time_spent(120)
        .estimate(180)
        .build(),
        SeedBuilder::new(
            "Daily Combat Training",
            "Physical conditioning and strength enhancement",
            Rank::C,
            "Training Ground",
        )
        .estimate(45)
        .build(),
    ]
}
