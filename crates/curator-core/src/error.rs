//! Error types for the curator core library.

use thiserror::Error;

/// Comprehensive error type for all curator operations.
#[derive(Error, Debug)]
pub enum CuratorError {
    /// Plan not found for the given ID
    #[error("plan not found: {id}")]
    PlanNotFound { id: String },

    /// WAL operation record not found for the given ID
    #[error("operation not found: {id}")]
    OperationNotFound { id: String },

    /// No execution log exists for the given plan
    #[error("no execution found for plan: {plan_id}")]
    ExecutionNotFound { plan_id: String },

    /// The filesystem has drifted from the plan's assumptions (missing
    /// source, occupied destination). Conflicts are skipped, not failed.
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    /// A path that is absent from the backend
    #[error("path not found: {path}")]
    PathNotFound { path: String },

    /// A path that exists but cannot be used as requested, or that resolves
    /// outside the configured filesystem root
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Filesystem backend I/O errors
    #[error("filesystem error at '{path}': {source}")]
    FileSystem {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation store I/O errors
    #[error("store error: {message}")]
    Storage {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization errors
    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Invalid input validation errors
    #[error("invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Configuration and runtime wiring errors
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl CuratorError {
    /// Creates a new conflict error with the given reason
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    /// Creates a new invalid-path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new input validation error
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True when this error records filesystem drift rather than a fault.
    ///
    /// The execution engine routes conflicts to the skipped list; every
    /// other error is a fault and lands in the failed list.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// True for the not-found family of errors
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PlanNotFound { .. }
                | Self::OperationNotFound { .. }
                | Self::ExecutionNotFound { .. }
                | Self::PathNotFound { .. }
        )
    }
}

/// Extension trait for Result to provide concise error mapping
pub trait ResultExt<T> {
    /// Map I/O errors into store errors with a message
    fn store_err(self, message: &str) -> Result<T>;

    /// Map I/O errors into filesystem errors at a path
    fn fs_err(self, path: &str) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn store_err(self, message: &str) -> Result<T> {
        self.map_err(|e| CuratorError::Storage {
            message: message.to_string(),
            source: e,
        })
    }

    fn fs_err(self, path: &str) -> Result<T> {
        self.map_err(|e| CuratorError::FileSystem {
            path: path.to_string(),
            source: e,
        })
    }
}

/// Result type alias for curator operations
pub type Result<T> = std::result::Result<T, CuratorError>;
