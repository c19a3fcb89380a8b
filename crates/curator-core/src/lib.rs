//! Core library for the curator file reorganization engine.
//!
//! Curator executes advisor-produced reorganization plans against
//! heterogeneous storage backends, durably and crash-safely. The crate is
//! organized along its dependency order:
//!
//! - [`models`]: plans, steps, WAL operation records, execution logs
//! - [`fs`]: the six-operation filesystem contract and its two reference
//!   backends (in-memory and sandboxed local disk)
//! - [`store`]: durable persistence for plans, the write-ahead log, and
//!   execution logs
//! - [`engine`]: the execution engine driving WAL-journaled, resumable plan
//!   runs with conflict/fault classification
//! - [`handlers`] / [`params`]: interface-agnostic business workflows
//! - [`display`]: markdown formatting for terminal and report output
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use curator_core::{
//!     fs::MemoryFileSystem,
//!     models::{Plan, Step},
//!     store::{MemoryOperationStore, OperationStore},
//!     ExecutionEngine,
//! };
//!
//! # async fn example() -> curator_core::Result<()> {
//! let fs = Arc::new(MemoryFileSystem::new());
//! fs.add_file("/report.pdf", b"...", "application/pdf");
//!
//! let store = Arc::new(MemoryOperationStore::new());
//! store.save_plan(&Plan::new(
//!     "tidy",
//!     vec![
//!         Step::create_dir("m1", "/Documents"),
//!         Step::move_file("m2", "/report.pdf", "/Documents/report.pdf"),
//!     ],
//! ))?;
//!
//! let engine = ExecutionEngine::new(fs, store);
//! let log = engine.execute_plan("tidy", false).await?;
//! assert_eq!(log.status.as_str(), "COMPLETED");
//! # Ok(())
//! # }
//! ```

pub mod display;
pub mod engine;
pub mod error;
pub mod fs;
pub mod handlers;
pub mod models;
pub mod params;
pub mod store;

// Re-export commonly used types
pub use display::{format_history, format_plan_list};
pub use engine::ExecutionEngine;
pub use error::{CuratorError, Result};
pub use fs::{FileMeta, FileSystem, LocalFileSystem, MemoryFileSystem};
pub use handlers::{
    handle_apply, handle_history, handle_import_plan, handle_list_plans, handle_resume,
    handle_show_plan, handle_status,
};
pub use models::{
    ExecutionLog, ExecutionStatus, Operation, Plan, PlanSummary, Step, StepKind, Summary,
};
pub use store::{FileOperationStore, MemoryOperationStore, OperationStore};
