//! Step model definition and related functionality.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of mutation a step performs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StepKind {
    /// Move a single file to a new location
    #[serde(rename = "FILE_MOVE")]
    MoveFile,

    /// Move a directory and all of its descendants
    #[serde(rename = "FOLDER_MOVE")]
    MoveDir,

    /// Create a directory (idempotent when it already exists)
    #[serde(rename = "CREATE_FOLDER")]
    CreateDir,
}

impl StepKind {
    /// Convert to the wire string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::MoveFile => "FILE_MOVE",
            StepKind::MoveDir => "FOLDER_MOVE",
            StepKind::CreateDir => "CREATE_FOLDER",
        }
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FILE_MOVE" => Ok(StepKind::MoveFile),
            "FOLDER_MOVE" => Ok(StepKind::MoveDir),
            "CREATE_FOLDER" => Ok(StepKind::CreateDir),
            _ => Err(format!("Invalid step kind: {s}")),
        }
    }
}

/// One atomic intended mutation within a plan.
///
/// Ordering is semantically significant: a step may depend on a directory
/// created by an earlier step, so the engine never reorders steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Step {
    /// Identifier of the step, unique within its plan
    #[serde(rename = "ID")]
    pub id: String,

    /// Source path; empty for directory creation
    #[serde(default)]
    pub source: String,

    /// Destination path
    pub destination: String,

    /// Human-readable reason the advisor proposed this step
    #[serde(default)]
    pub reason: String,

    /// What kind of mutation this step performs
    #[serde(rename = "Type")]
    pub kind: StepKind,

    /// Number of files affected, as a hint for directory moves
    #[serde(default)]
    pub file_count: u32,
}

impl Step {
    /// Creates a directory-creation step.
    pub fn create_dir(id: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: String::new(),
            destination: destination.into(),
            reason: String::new(),
            kind: StepKind::CreateDir,
            file_count: 0,
        }
    }

    /// Creates a file-move step.
    pub fn move_file(
        id: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            destination: destination.into(),
            reason: String::new(),
            kind: StepKind::MoveFile,
            file_count: 0,
        }
    }

    /// Creates a directory-move step.
    pub fn move_dir(
        id: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            destination: destination.into(),
            reason: String::new(),
            kind: StepKind::MoveDir,
            file_count: 0,
        }
    }

    /// Attach a reason to the step.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}
