//! Write-ahead log records and completion markers.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::Step;
use crate::error::Result;

/// Kind label for WAL records that carry a serialized step.
pub const STEP_OPERATION_KIND: &str = "move";

/// Kind label for completion markers.
pub const COMPLETION_MARKER_KIND: &str = "completion_marker";

/// Suffix appended to an operation ID to form its completion-marker ID.
const COMPLETION_SUFFIX: &str = "_completed";

/// One write-ahead log record.
///
/// A record is appended before its step is attempted; a sibling record with
/// the `_completed` suffix is written once the engine is finished reasoning
/// about the step, regardless of the step's outcome. The payload is an
/// opaque blob so that new step kinds never force a migration of old
/// records; decoders tolerate payloads they cannot interpret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Operation {
    /// Globally unique ID, `<plan-id>-<step-id>` for step records
    #[serde(rename = "ID")]
    pub id: String,

    /// Kind label; `move` for step records, `completion_marker` for markers
    #[serde(rename = "Type")]
    pub kind: String,

    /// Serialized step payload; empty for completion markers
    #[serde(with = "base64_bytes", default)]
    pub data: Vec<u8>,

    /// When the record was created
    pub timestamp: Timestamp,
}

impl Operation {
    /// Creates a WAL record for a step of the given plan.
    pub fn for_step(plan_id: &str, step: &Step) -> Result<Self> {
        let data = serde_json::to_vec(step)?;
        Ok(Self {
            id: format!("{plan_id}-{}", step.id),
            kind: STEP_OPERATION_KIND.to_string(),
            data,
            timestamp: Timestamp::now(),
        })
    }

    /// Creates the completion marker for the operation with the given ID.
    pub fn completion_marker(operation_id: &str) -> Self {
        Self {
            id: completion_id(operation_id),
            kind: COMPLETION_MARKER_KIND.to_string(),
            data: Vec::new(),
            timestamp: Timestamp::now(),
        }
    }

    /// Decodes the step payload carried by this record.
    pub fn decode_step(&self) -> Result<Step> {
        Ok(serde_json::from_slice(&self.data)?)
    }

    /// True when this record is a completion marker rather than a step.
    pub fn is_completion_marker(&self) -> bool {
        self.kind == COMPLETION_MARKER_KIND || self.id.ends_with(COMPLETION_SUFFIX)
    }
}

/// Completion-marker ID for the operation with the given ID.
pub fn completion_id(operation_id: &str) -> String {
    format!("{operation_id}{COMPLETION_SUFFIX}")
}

/// Strips the completion suffix, if present.
pub fn base_operation_id(id: &str) -> Option<&str> {
    id.strip_suffix(COMPLETION_SUFFIX)
}

/// Serde adapter carrying binary payloads as base64 strings on the wire.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        // Markers written by older versions omit the field or carry null.
        let encoded = Option::<String>::deserialize(deserializer)?;
        match encoded {
            Some(s) if !s.is_empty() => STANDARD.decode(s).map_err(serde::de::Error::custom),
            _ => Ok(Vec::new()),
        }
    }
}
