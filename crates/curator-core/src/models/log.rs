//! Execution log model: the per-plan record of step outcomes.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ExecutionStatus;

/// A step that was applied successfully.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CompletedStep {
    /// ID of the step within its plan
    #[serde(rename = "MoveID")]
    pub step_id: String,

    /// When the step completed
    pub timestamp: Timestamp,
}

/// A step that hit a fault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FailedStep {
    /// ID of the step within its plan
    #[serde(rename = "MoveID")]
    pub step_id: String,

    /// When the failure was recorded
    pub timestamp: Timestamp,

    /// Error text for the operator
    pub error: String,
}

/// A step skipped because the filesystem drifted from the plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SkippedStep {
    /// ID of the step within its plan
    #[serde(rename = "MoveID")]
    pub step_id: String,

    /// When the skip was recorded
    pub timestamp: Timestamp,

    /// Why the step was skipped
    pub reason: String,
}

/// The record of one execution of a plan.
///
/// Checkpointed after every step and finalized with a terminal status.
/// The three outcome lists are disjoint: a step ID appears in at most one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ExecutionLog {
    /// ID of the executed plan
    #[serde(rename = "PlanID")]
    pub plan_id: String,

    /// When the execution started
    pub timestamp: Timestamp,

    /// Current status; `InProgress` until the engine terminates
    pub status: ExecutionStatus,

    /// Steps that were applied, in execution order
    #[serde(default)]
    pub completed: Vec<CompletedStep>,

    /// Steps that hit a fault, in execution order
    #[serde(default)]
    pub failed: Vec<FailedStep>,

    /// Steps skipped due to conflicts, in execution order
    #[serde(default)]
    pub skipped: Vec<SkippedStep>,
}

impl ExecutionLog {
    /// Creates an empty in-progress log for the given plan, started now.
    pub fn begin(plan_id: impl Into<String>) -> Self {
        Self {
            plan_id: plan_id.into(),
            timestamp: Timestamp::now(),
            status: ExecutionStatus::InProgress,
            completed: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Records a successful step.
    pub fn record_completed(&mut self, step_id: impl Into<String>) {
        self.completed.push(CompletedStep {
            step_id: step_id.into(),
            timestamp: Timestamp::now(),
        });
    }

    /// Records a faulted step.
    pub fn record_failed(&mut self, step_id: impl Into<String>, error: impl Into<String>) {
        self.failed.push(FailedStep {
            step_id: step_id.into(),
            timestamp: Timestamp::now(),
            error: error.into(),
        });
    }

    /// Records a conflicted step.
    pub fn record_skipped(&mut self, step_id: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedStep {
            step_id: step_id.into(),
            timestamp: Timestamp::now(),
            reason: reason.into(),
        });
    }

    /// Derives the terminal status from the outcome lists.
    ///
    /// Any failure alongside a completion is `Partial`; failures with no
    /// completions are `Failed`; skips without failures are `Partial`;
    /// everything else (including an empty plan) is `Completed`.
    pub fn terminal_status(&self) -> ExecutionStatus {
        if !self.failed.is_empty() {
            if !self.completed.is_empty() {
                ExecutionStatus::Partial
            } else {
                ExecutionStatus::Failed
            }
        } else if !self.skipped.is_empty() {
            ExecutionStatus::Partial
        } else {
            ExecutionStatus::Completed
        }
    }

    /// Sets the status to the derived terminal status.
    pub fn finalize(&mut self) {
        self.status = self.terminal_status();
    }
}
