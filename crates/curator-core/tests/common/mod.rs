//! Shared fixtures for the integration test suites.

use std::sync::Arc;

use curator_core::{
    models::{Plan, Step},
    ExecutionEngine, MemoryFileSystem, MemoryOperationStore, OperationStore,
};

/// An engine over fresh in-memory backends, with handles kept for
/// inspection after execution.
pub struct Harness {
    pub fs: Arc<MemoryFileSystem>,
    pub store: Arc<MemoryOperationStore>,
    pub engine: ExecutionEngine,
}

pub fn harness() -> Harness {
    let fs = Arc::new(MemoryFileSystem::new());
    let store = Arc::new(MemoryOperationStore::new());
    let engine = ExecutionEngine::new(fs.clone(), store.clone());
    Harness { fs, store, engine }
}

/// Saves a plan with the given steps and returns it.
pub fn save_plan(store: &dyn OperationStore, id: &str, steps: Vec<Step>) -> Plan {
    let plan = Plan::new(id, steps);
    store.save_plan(&plan).expect("failed to save plan");
    plan
}
