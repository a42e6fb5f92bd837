//! Core domain types and rules for the hunter application.
//!
//! This crate holds everything that does not touch the outside world:
//! dungeons (tasks) and their objectives, hunter ranks, player progression
//! and the [`ProgressionEngine`] that applies every mutation while keeping
//! the progress, experience and level invariants.
//!
//! # Overview
//!
//! - [`task`]: task and subtask types
//! - [`rank`]: difficulty tiers and their rewards
//! - [`player`]: level and experience counters
//! - [`engine`]: the state machine, plus a thread-safe [`SharedEngine`]
//! - [`stats`]: derived dashboard values
//! - [`notification`]: user-facing messages for state changes
//! - [`seed`]: sample dungeons for a new profile
//! - [`error`]: error types for engine operations
//!
//! # Examples
//!
//! ```
//! use hunter_protocol::{ProgressionEngine, Rank};
//!
//! let mut engine = ProgressionEngine::new();
//! let task = engine
//!     .register_task("Daily Combat Training", "", Rank::A, "Training Ground")
//!     .unwrap();
//!
//! let completion = engine.complete_task(task.id).unwrap();
//! assert_eq!(completion.xp_gained, 200);
//! assert_eq!(completion.level_up, Some(2));
//! assert_eq!(engine.player().level, 2);
//! ```

pub mod engine;
pub mod error;
pub mod notification;
pub mod player;
pub mod rank;
pub mod seed;
pub mod stats;
pub mod task;

pub use engine::{Completion, ProgressionEngine, SharedEngine};
pub use error::{ErrorKind, ProtocolError, Result};
pub use notification::{Notification, Severity};
pub use player::{PlayerProgression, XP_PER_LEVEL, level_for_xp};
pub use rank::Rank;
pub use stats::PlayerStats;
pub use task::{Subtask, SubtaskId, Task, TaskId};
