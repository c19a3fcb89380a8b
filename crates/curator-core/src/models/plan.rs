//! Plan model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::Step;

/// A durable, immutable reorganization proposal produced by an advisor.
///
/// Plans are saved once and never mutated; re-saving a plan under the same
/// ID replaces the stored copy wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Plan {
    /// Advisor-chosen identifier, unique within the store (case-sensitive)
    #[serde(rename = "ID")]
    pub id: String,

    /// Timestamp when the plan was generated (UTC)
    pub timestamp: Timestamp,

    /// Ordered sequence of intended mutations
    #[serde(default)]
    pub moves: Vec<Step>,

    /// Reporting-only counters; never consulted by the engine
    #[serde(default)]
    pub summary: Summary,

    /// Free-text rationale from the advisor
    #[serde(default)]
    pub rationale: String,
}

impl Plan {
    /// Creates a plan with the given id and steps, timestamped now.
    pub fn new(id: impl Into<String>, moves: Vec<Step>) -> Self {
        Self {
            id: id.into(),
            timestamp: Timestamp::now(),
            moves,
            summary: Summary::default(),
            rationale: String::new(),
        }
    }
}

/// Advisor-reported counters describing what a plan would accomplish.
///
/// These exist for reporting only; the engine derives nothing from them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Summary {
    /// Number of directories the plan creates
    pub folders_created: u32,

    /// Number of individual files the plan moves
    pub files_moved: u32,

    /// Number of directories merged away by the plan
    #[serde(rename = "FoldersMovedDeduplicated")]
    pub folders_deduplicated: u32,

    /// Advisor's description of the hierarchy-depth change
    pub depth_reduction: String,

    /// Advisor's description of the expected organization improvement
    pub organization_improvement: String,
}
