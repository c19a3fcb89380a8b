//! Plan execution engine with write-ahead logging and crash recovery.
//!
//! The engine drives each step of a stored plan through the same cycle:
//! append a WAL record, attempt the mutation, classify the outcome, write
//! the completion marker, checkpoint the execution log. The WAL append for
//! a step happens-before its attempt, which happens-before its completion
//! marker, which happens-before the next step's WAL append. A crash
//! therefore leaves a prefix of attempted steps in the WAL with at most the
//! last one missing its marker, which is exactly the state
//! [`ExecutionEngine::resume_pending_operations`] reconciles.
//!
//! Execution is strictly sequential: step ordering carries
//! directory-creation prerequisites, and a sequential run yields a linear,
//! auditable WAL. The public operations are `async` and run the blocking
//! filesystem/store work on the tokio blocking pool.

use std::sync::Arc;

use log::{info, warn};
use tokio::task;

use crate::{
    error::{CuratorError, Result},
    fs::{paths, FileSystem},
    models::{ExecutionLog, ExecutionStatus, Operation, Step, StepKind, STEP_OPERATION_KIND},
    store::OperationStore,
};

/// Executes reorganization plans against a filesystem, journaling every
/// step through the operation store.
///
/// The engine has no state of its own beyond the injected filesystem and
/// store references.
pub struct ExecutionEngine {
    fs: Arc<dyn FileSystem>,
    store: Arc<dyn OperationStore>,
}

impl ExecutionEngine {
    /// Creates an engine over the given filesystem and store.
    pub fn new(fs: Arc<dyn FileSystem>, store: Arc<dyn OperationStore>) -> Self {
        Self { fs, store }
    }

    /// Executes the stored plan with the given ID and returns its final
    /// execution log.
    ///
    /// Conflicting steps are skipped and never abort the run. Faulted steps
    /// are recorded as failed; with `fail_fast` set, the first fault
    /// persists a `FAILED` log and returns the fault to the caller, leaving
    /// that step's WAL record pending for a later resume.
    pub async fn execute_plan(&self, plan_id: &str, fail_fast: bool) -> Result<ExecutionLog> {
        let fs = Arc::clone(&self.fs);
        let store = Arc::clone(&self.store);
        let plan_id = plan_id.to_string();

        task::spawn_blocking(move || run_plan(fs.as_ref(), store.as_ref(), &plan_id, fail_fast))
            .await
            .map_err(|e| CuratorError::Configuration {
                message: format!("task join error: {e}"),
            })?
    }

    /// Replays every pending WAL record left behind by an interrupted run.
    ///
    /// Each pending step is attempted once and its completion marker is
    /// written regardless of the outcome, so the WAL is quiescent when this
    /// returns. Per-step problems are logged, never propagated; resume is a
    /// best-effort cleanup and does not touch prior execution logs.
    pub async fn resume_pending_operations(&self) -> Result<()> {
        let fs = Arc::clone(&self.fs);
        let store = Arc::clone(&self.store);

        task::spawn_blocking(move || run_resume(fs.as_ref(), store.as_ref()))
            .await
            .map_err(|e| CuratorError::Configuration {
                message: format!("task join error: {e}"),
            })?
    }

    /// Returns the most recent execution log for a plan, preferring a
    /// terminal log over an in-progress checkpoint.
    pub async fn get_execution_status(&self, plan_id: &str) -> Result<ExecutionLog> {
        let store = Arc::clone(&self.store);
        let plan_id = plan_id.to_string();

        task::spawn_blocking(move || run_status(store.as_ref(), &plan_id))
            .await
            .map_err(|e| CuratorError::Configuration {
                message: format!("task join error: {e}"),
            })?
    }
}

fn run_plan(
    fs: &dyn FileSystem,
    store: &dyn OperationStore,
    plan_id: &str,
    fail_fast: bool,
) -> Result<ExecutionLog> {
    let plan = store.get_plan(plan_id)?;

    let mut log = ExecutionLog::begin(plan_id);
    store.save_execution_log(&log)?;

    for step in &plan.moves {
        // WAL record goes down before the mutation is attempted.
        let op = Operation::for_step(plan_id, step)?;
        store.log_operation(&op)?;

        match apply_step(fs, step) {
            Ok(()) => {
                info!("step {} completed", step.id);
                log.record_completed(&step.id);
            }
            Err(err) if err.is_conflict() => {
                info!("step {} skipped: {err}", step.id);
                log.record_skipped(&step.id, err.to_string());
            }
            Err(err) => {
                warn!("step {} failed: {err}", step.id);
                log.record_failed(&step.id, err.to_string());

                if fail_fast {
                    log.status = ExecutionStatus::Failed;
                    store.save_execution_log(&log)?;
                    return Err(err);
                }
            }
        }

        store.mark_operation_complete(&op.id)?;
        store.save_execution_log(&log)?;
    }

    log.finalize();
    store.save_execution_log(&log)?;
    Ok(log)
}

/// Applies one step against the filesystem.
///
/// The pre-checks run here rather than in the backend so that drift is
/// detected uniformly across backends: a vanished source or an occupied
/// destination is a conflict, everything else a fault.
fn apply_step(fs: &dyn FileSystem, step: &Step) -> Result<()> {
    match step.kind {
        StepKind::CreateDir => fs.create_dir(&step.destination),
        StepKind::MoveFile | StepKind::MoveDir => {
            if !fs.exists(&step.source)? {
                return Err(CuratorError::conflict(format!(
                    "source no longer exists: {}",
                    step.source
                )));
            }
            if fs.exists(&step.destination)? {
                return Err(CuratorError::conflict(format!(
                    "destination already exists: {}",
                    step.destination
                )));
            }

            fs.create_dir(&paths::parent(&step.destination))?;
            fs.move_entry(&step.source, &step.destination)
        }
    }
}

fn run_resume(fs: &dyn FileSystem, store: &dyn OperationStore) -> Result<()> {
    let pending = store.get_pending_operations()?;
    if pending.is_empty() {
        return Ok(());
    }

    info!("found {} pending operations to resume", pending.len());

    for op in pending {
        if op.kind == STEP_OPERATION_KIND {
            match op.decode_step() {
                Ok(step) => match apply_step(fs, &step) {
                    Ok(()) => info!("resumed operation {}", op.id),
                    Err(err) if err.is_conflict() => {
                        info!("operation {} no longer applies: {err}", op.id);
                    }
                    Err(err) => warn!("failed to resume operation {}: {err}", op.id),
                },
                Err(err) => {
                    warn!("cannot decode payload of operation {}: {err}", op.id);
                }
            }
        } else {
            warn!("operation {} has unknown kind '{}'", op.id, op.kind);
        }

        // Completion is recorded regardless of outcome so the WAL quiesces.
        if let Err(err) = store.mark_operation_complete(&op.id) {
            warn!("failed to mark operation {} complete: {err}", op.id);
        }
    }

    Ok(())
}

fn run_status(store: &dyn OperationStore, plan_id: &str) -> Result<ExecutionLog> {
    let history = store.get_execution_history()?;

    if let Some(log) = history
        .iter()
        .find(|log| log.plan_id == plan_id && log.status.is_terminal())
    {
        return Ok(log.clone());
    }

    history
        .into_iter()
        .find(|log| log.plan_id == plan_id)
        .ok_or_else(|| CuratorError::ExecutionNotFound {
            plan_id: plan_id.to_string(),
        })
}
