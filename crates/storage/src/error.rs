//! Error types for storage operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing persisted values.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A file in the store could not be read, written or removed.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A stored document is not valid JSON.
    #[error("malformed value stored under '{key}': {source}")]
    Malformed {
        /// The key whose document could not be parsed.
        key: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A stored document is valid JSON but not the shape its key expects.
    #[error("unusable value stored under '{key}': {reason}")]
    Undecodable {
        /// The key whose document was rejected.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A value could not be converted to JSON.
    #[error("failed to serialize value for '{key}': {source}")]
    Serialize {
        /// The key being written.
        key: String,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The platform data directory could not be determined.
    #[error("could not determine data directory")]
    NoDataDirectory,
}

/// A specialized Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = StorageError::Io {
            path: PathBuf::from("/tmp/store/tasks.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "storage I/O error at /tmp/store/tasks.json: denied"
        );
    }

    #[test]
    fn malformed_error_names_the_key() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = StorageError::Malformed {
            key: "u-tasks".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("malformed value stored under 'u-tasks'"));
    }

    #[test]
    fn undecodable_error_names_the_key() {
        let err = StorageError::Undecodable {
            key: "u-playerXP".to_string(),
            reason: "expected a non-negative number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unusable value stored under 'u-playerXP': expected a non-negative number"
        );
    }

    #[test]
    fn no_data_directory_display() {
        assert_eq!(
            StorageError::NoDataDirectory.to_string(),
            "could not determine data directory"
        );
    }
}
