//! Plan summary types for listings.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ExecutionStatus, Plan};

/// Summary information about a stored plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Plan ID
    pub id: String,
    /// When the plan was generated
    pub timestamp: Timestamp,
    /// Status of the most recent execution; `None` when never executed
    pub status: Option<ExecutionStatus>,
    /// Number of steps in the plan
    pub move_count: usize,
}

impl PlanSummary {
    /// Creates a summary from a plan and the status of its latest execution.
    pub fn from_plan(plan: &Plan, status: Option<ExecutionStatus>) -> Self {
        Self {
            id: plan.id.clone(),
            timestamp: plan.timestamp,
            status,
            move_count: plan.moves.len(),
        }
    }

    /// Status tag for display; `pending` when the plan was never executed.
    pub fn status_label(&self) -> &'static str {
        match self.status {
            Some(status) => status.as_str(),
            None => "pending",
        }
    }
}
