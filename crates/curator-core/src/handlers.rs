//! Handler functions for the business workflows exposed to interfaces.
//!
//! Each handler encapsulates one complete workflow over the engine and
//! store, returning structured data for the caller to format. The CLI is
//! one consumer; embedders wire the same functions to their own surfaces.

use std::sync::Arc;

use crate::{
    engine::ExecutionEngine,
    error::Result,
    models::{ExecutionLog, Plan, PlanSummary},
    params::{Apply, PlanId},
    store::OperationStore,
};

/// Handle listing all stored plans as summaries, newest first.
pub async fn handle_list_plans(store: &Arc<dyn OperationStore>) -> Result<Vec<PlanSummary>> {
    let store = Arc::clone(store);
    blocking(move || store.list_plans()).await
}

/// Handle showing a stored plan in full.
pub async fn handle_show_plan(store: &Arc<dyn OperationStore>, params: &PlanId) -> Result<Plan> {
    let store = Arc::clone(store);
    let id = params.id.clone();
    blocking(move || store.get_plan(&id)).await
}

/// Handle importing an advisor-produced plan, replacing any stored plan
/// with the same ID.
pub async fn handle_import_plan(store: &Arc<dyn OperationStore>, plan: Plan) -> Result<Plan> {
    let store = Arc::clone(store);
    blocking(move || {
        store.save_plan(&plan)?;
        Ok(plan)
    })
    .await
}

/// Handle applying a plan: quiesce the WAL first, then execute.
///
/// Resume failures are reported but do not block the execution; they
/// describe a previous run, not this one.
pub async fn handle_apply(engine: &ExecutionEngine, params: &Apply) -> Result<ExecutionLog> {
    if let Err(err) = engine.resume_pending_operations().await {
        log::warn!("failed to resume pending operations: {err}");
    }

    engine.execute_plan(&params.plan_id, params.fail_fast).await
}

/// Handle querying the execution status of a plan.
pub async fn handle_status(engine: &ExecutionEngine, params: &PlanId) -> Result<ExecutionLog> {
    engine.get_execution_status(&params.id).await
}

/// Handle listing the execution history, newest first.
pub async fn handle_history(store: &Arc<dyn OperationStore>) -> Result<Vec<ExecutionLog>> {
    let store = Arc::clone(store);
    blocking(move || store.get_execution_history()).await
}

/// Handle replaying pending WAL records without executing a plan.
pub async fn handle_resume(engine: &ExecutionEngine) -> Result<()> {
    engine.resume_pending_operations().await
}

async fn blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| crate::error::CuratorError::Configuration {
            message: format!("task join error: {e}"),
        })?
}
