//! Parameter structures for curator operations.
//!
//! Shared parameter structures usable across different interfaces (CLI,
//! embedders) without framework-specific derives or dependencies.

use serde::{Deserialize, Serialize};

/// Parameters for operations addressed by plan ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanId {
    /// ID of the plan to operate on
    pub id: String,
}

/// Parameters for applying a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Apply {
    /// ID of the plan to execute
    pub plan_id: String,
    /// Abort on the first fault instead of recording it and continuing.
    /// Conflicts are skipped either way.
    #[serde(default)]
    pub fail_fast: bool,
}
