//! In-memory operation store for tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::OperationStore;
use crate::error::{CuratorError, Result};
use crate::models::{operation, ExecutionLog, Operation, Plan, PlanSummary};

#[derive(Debug, Default)]
struct Inner {
    plans: HashMap<String, Plan>,
    operations: BTreeMap<String, Operation>,
    execution_logs: HashMap<String, ExecutionLog>,
}

/// Operation store backed by process memory.
///
/// Returned values are clones, so callers can never mutate stored state.
#[derive(Debug, Default)]
pub struct MemoryOperationStore {
    inner: RwLock<Inner>,
}

impl MemoryOperationStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all stored data.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        *inner = Inner::default();
    }
}

impl OperationStore for MemoryOperationStore {
    fn save_plan(&self, plan: &Plan) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.plans.insert(plan.id.clone(), plan.clone());
        Ok(())
    }

    fn get_plan(&self, id: &str) -> Result<Plan> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner
            .plans
            .get(id)
            .cloned()
            .ok_or_else(|| CuratorError::PlanNotFound { id: id.to_string() })
    }

    fn list_plans(&self) -> Result<Vec<PlanSummary>> {
        let inner = self.inner.read().expect("store lock poisoned");

        let mut summaries: Vec<PlanSummary> = inner
            .plans
            .values()
            .map(|plan| {
                let status = inner.execution_logs.get(&plan.id).map(|log| log.status);
                PlanSummary::from_plan(plan, status)
            })
            .collect();

        summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(summaries)
    }

    fn log_operation(&self, op: &Operation) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.operations.insert(op.id.clone(), op.clone());
        Ok(())
    }

    fn get_pending_operations(&self) -> Result<Vec<Operation>> {
        let inner = self.inner.read().expect("store lock poisoned");

        let mut pending: Vec<Operation> = inner
            .operations
            .values()
            .filter(|op| {
                !op.is_completion_marker()
                    && !inner
                        .operations
                        .contains_key(&operation::completion_id(&op.id))
            })
            .cloned()
            .collect();

        pending.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(pending)
    }

    fn mark_operation_complete(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if !inner.operations.contains_key(id) {
            return Err(CuratorError::OperationNotFound { id: id.to_string() });
        }

        let marker = Operation::completion_marker(id);
        inner.operations.insert(marker.id.clone(), marker);
        Ok(())
    }

    fn save_execution_log(&self, log: &ExecutionLog) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner
            .execution_logs
            .insert(log.plan_id.clone(), log.clone());
        Ok(())
    }

    fn get_execution_history(&self) -> Result<Vec<ExecutionLog>> {
        let inner = self.inner.read().expect("store lock poisoned");

        let mut logs: Vec<ExecutionLog> = inner.execution_logs.values().cloned().collect();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(logs)
    }
}
