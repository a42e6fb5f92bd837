//! Error types for the hunter-protocol crate.
//!
//! This module defines all error types that can occur when driving the
//! progression engine, including lookups of unknown ids, rejected input and
//! operations that are not allowed in the task's current state.

use thiserror::Error;

use crate::task::{SubtaskId, TaskId};

/// Coarse classification of a [`ProtocolError`].
///
/// Callers that only need to decide how to present a failure (for example a
/// CLI choosing an exit message) can match on this instead of every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced task or subtask does not exist.
    NotFound,
    /// A required text field was empty or a value was malformed.
    InvalidInput,
    /// The operation is not allowed in the task's current state.
    InvalidState,
}

/// Errors that can occur during protocol operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    /// A task with the given ID was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A subtask with the given ID was not found on the task.
    #[error("objective {subtask} not found on task {task}")]
    SubtaskNotFound {
        /// The task that was searched.
        task: TaskId,
        /// The subtask that could not be found.
        subtask: SubtaskId,
    },

    /// A required field was empty or a value was out of its domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Manual progress was set on a task whose progress is driven by subtasks.
    #[error("progress of task {0} is derived from its objectives and cannot be set manually")]
    ProgressDerivedFromSubtasks(TaskId),

    /// A rank could not be parsed from text.
    #[error("invalid rank '{0}': expected one of E, D, C, B, A, S")]
    InvalidRank(String),
}

impl ProtocolError {
    /// Returns the coarse classification of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use hunter_protocol::{ErrorKind, ProtocolError, TaskId};
    ///
    /// let err = ProtocolError::TaskNotFound(TaskId::new_v4());
    /// assert_eq!(err.kind(), ErrorKind::NotFound);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TaskNotFound(_) | Self::SubtaskNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidInput(_) | Self::InvalidRank(_) => ErrorKind::InvalidInput,
            Self::ProgressDerivedFromSubtasks(_) => ErrorKind::InvalidState,
        }
    }
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ProtocolError::InvalidInput("title cannot be empty".to_string());
        assert_eq!(err.to_string(), "invalid input: title cannot be empty");

        let task_id = TaskId::new_v4();
        let err = ProtocolError::TaskNotFound(task_id);
        assert!(err.to_string().contains("task not found"));

        let err = ProtocolError::InvalidRank("Z".to_string());
        assert_eq!(
            err.to_string(),
            "invalid rank 'Z': expected one of E, D, C, B, A, S"
        );
    }

    #[test]
    fn error_kinds() {
        let task = TaskId::new_v4();
        let subtask = SubtaskId::new_v4();

        assert_eq!(ProtocolError::TaskNotFound(task).kind(), ErrorKind::NotFound);
        assert_eq!(
            ProtocolError::SubtaskNotFound { task, subtask }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ProtocolError::InvalidInput(String::new()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            ProtocolError::ProgressDerivedFromSubtasks(task).kind(),
            ErrorKind::InvalidState
        );
    }
}
