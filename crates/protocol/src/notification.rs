//! User-facing notifications for state changes.
//!
//! The engine reports what happened through return values; this module turns
//! those outcomes into the short "system notification" messages a front-end
//! shows after each action.

use serde::{Deserialize, Serialize};

use crate::engine::Completion;

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    /// A celebration, such as a level up.
    Highlight,
    /// A recoverable failure.
    Error,
}

/// A state change worth telling the player about.
///
/// # Examples
///
/// ```
/// use hunter_protocol::Notification;
///
/// let note = Notification::LevelUp { level: 4 };
/// assert_eq!(note.title(), "RANK UP!");
/// assert_eq!(note.description(), "Congratulations! You've achieved Level 4!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Notification {
    /// A new dungeon was registered.
    TaskRegistered {
        /// Title of the new task.
        title: String,
    },
    /// A dungeon was cleared without reaching a new level.
    DungeonCleared {
        /// Experience awarded.
        xp: u32,
    },
    /// Clearing a dungeon raised the player's level.
    LevelUp {
        /// The level reached.
        level: u32,
    },
    /// A cleared dungeon was reopened.
    DungeonReopened {
        /// Title of the reopened task.
        title: String,
    },
    ProgressUpdated {
        progress: u32,
    },
    ObjectiveAdded {
        title: String,
    },
    ObjectiveToggled {
        title: String,
        completed: bool,
    },
    /// Time was logged against a dungeon.
    TimeLogged {
        /// Minutes added.
        minutes: u32,
    },
    /// A dungeon was deleted.
    DungeonRemoved,
    /// New guidance text arrived.
    GuidanceUpdated,
    /// The guidance provider failed and a fallback message is shown instead.
    GuidanceUnavailable,
}

impl Notification {
    /// Short headline for the notification.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::TaskRegistered { .. } => "System Notification",
            Self::DungeonCleared { .. } => "Dungeon Cleared!",
            Self::LevelUp { .. } => "RANK UP!",
            Self::DungeonReopened { .. } => "Dungeon Reopened",
            Self::ProgressUpdated { .. } => "Progress Updated",
            Self::ObjectiveAdded { .. } | Self::ObjectiveToggled { .. } => "Objective Updated",
            Self::TimeLogged { .. } => "Time Logged!",
            Self::DungeonRemoved => "Dungeon Removed",
            Self::GuidanceUpdated => "System Analysis Complete!",
            Self::GuidanceUnavailable => "System Error",
        }
    }

    /// One-line body text.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::TaskRegistered { title } => {
                format!("New dungeon \"{title}\" has been registered to your hunter profile.")
            }
            Self::DungeonCleared { xp } => {
                format!("+{xp} EXP gained! Continue your ascent, Hunter.")
            }
            Self::LevelUp { level } => format!("Congratulations! You've achieved Level {level}!"),
            Self::DungeonReopened { title } => {
                format!("Dungeon \"{title}\" is active again. Its EXP has been returned.")
            }
            Self::ProgressUpdated { progress } => format!("Dungeon progress set to {progress}%."),
            Self::ObjectiveAdded { title } => format!("New objective \"{title}\" added."),
            Self::ObjectiveToggled { title, completed } => {
                if *completed {
                    format!("Objective \"{title}\" cleared.")
                } else {
                    format!("Objective \"{title}\" reopened.")
                }
            }
            Self::TimeLogged { minutes } => {
                format!("Added {minutes} minutes to dungeon progress.")
            }
            Self::DungeonRemoved => {
                "Dungeon has been removed from your hunter registry.".to_string()
            }
            Self::GuidanceUpdated => "AI guidance protocol has been updated.".to_string(),
            Self::GuidanceUnavailable => {
                "Unable to access AI guidance. Please try again later.".to_string()
            }
        }
    }

    /// How prominently this notification should be shown.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::LevelUp { .. } => Severity::Highlight,
            Self::GuidanceUnavailable => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl Completion {
    /// Maps this completion to its notification; a no-op completion has none.
    #[must_use]
    pub fn notification(&self) -> Option<Notification> {
        if self.was_noop() {
            return None;
        }
        Some(match self.level_up {
            Some(level) => Notification::LevelUp { level },
            None => Notification::DungeonCleared {
                xp: self.xp_gained,
            },
        })
    }
}
