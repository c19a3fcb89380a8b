//! Status enumeration for plan executions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of execution statuses.
///
/// `InProgress` is checkpoint state only; a normally terminating execution
/// always ends in one of the three terminal statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// Execution has started and is checkpointing progress
    InProgress,

    /// Every step completed
    Completed,

    /// Some steps completed while others failed or were skipped
    Partial,

    /// Steps failed and none completed
    Failed,
}

impl ExecutionStatus {
    /// Convert to the wire string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::InProgress => "IN_PROGRESS",
            ExecutionStatus::Completed => "COMPLETED",
            ExecutionStatus::Partial => "PARTIAL",
            ExecutionStatus::Failed => "FAILED",
        }
    }

    /// True for the three terminal statuses
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::InProgress)
    }
}

impl FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(ExecutionStatus::InProgress),
            "COMPLETED" => Ok(ExecutionStatus::Completed),
            "PARTIAL" => Ok(ExecutionStatus::Partial),
            "FAILED" => Ok(ExecutionStatus::Failed),
            _ => Err(format!("Invalid execution status: {s}")),
        }
    }
}
