//! Durable persistence for plans, WAL records, and execution logs.
//!
//! The store is a key-value surface with three logical namespaces:
//! **plans**, **operations** (the write-ahead log), and **execution logs**.
//! Two implementations ship with the crate:
//!
//! - [`MemoryOperationStore`]: process-memory, used by the test suites;
//!   observable behavior matches the durable implementation
//! - [`FileOperationStore`]: one JSON file per record under a configured
//!   store root, written atomically via write-to-temp-then-rename
//!
//! All mutating operations hold an exclusive lock; reads may proceed
//! concurrently. A successful write is observed by every subsequent read.

use crate::error::Result;
use crate::models::{ExecutionLog, Operation, Plan, PlanSummary};

pub mod file;
pub mod memory;

pub use file::FileOperationStore;
pub use memory::MemoryOperationStore;

/// Persistent store for plans, WAL operation records, and execution logs.
pub trait OperationStore: Send + Sync {
    /// Persists a plan under its ID, replacing any prior plan with that ID.
    fn save_plan(&self, plan: &Plan) -> Result<()>;

    /// Loads a plan by ID. Corrupt records behave as not-found.
    fn get_plan(&self, id: &str) -> Result<Plan>;

    /// Lists plan summaries, newest first by plan timestamp. Corrupt
    /// entries are skipped rather than failing the listing.
    fn list_plans(&self) -> Result<Vec<PlanSummary>>;

    /// Appends a WAL record. Idempotent by operation ID.
    fn log_operation(&self, operation: &Operation) -> Result<()>;

    /// Lists WAL records without a completion marker, oldest first by
    /// record timestamp. Completion markers themselves are never returned.
    fn get_pending_operations(&self) -> Result<Vec<Operation>>;

    /// Writes the completion marker for an operation. Fails when the base
    /// record does not exist.
    fn mark_operation_complete(&self, id: &str) -> Result<()>;

    /// Persists an execution log keyed by plan ID, replacing any prior log
    /// for the same plan. The latest execution wins.
    fn save_execution_log(&self, log: &ExecutionLog) -> Result<()>;

    /// Lists execution logs, newest first by start timestamp.
    fn get_execution_history(&self) -> Result<Vec<ExecutionLog>>;
}
