//! On-disk operation store: one JSON file per record.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::OperationStore;
use crate::error::{CuratorError, Result, ResultExt};
use crate::models::{operation, ExecutionLog, ExecutionStatus, Operation, Plan, PlanSummary};

const PLANS_DIR: &str = "plans";
const OPERATIONS_DIR: &str = "operations";
const EXECUTION_LOGS_DIR: &str = "execution_logs";

/// Operation store persisting each record as a pretty-printed JSON file.
///
/// Layout under the store root:
///
/// ```text
/// <root>/plans/<plan-id>.json
/// <root>/operations/<operation-id>.json
/// <root>/operations/<operation-id>_completed.json
/// <root>/execution_logs/<plan-id>.json
/// ```
///
/// Every write goes to a temp file first and is renamed into place, so a
/// crash mid-write leaves either the old record or the new one, never a
/// partial file.
pub struct FileOperationStore {
    root: PathBuf,
    lock: RwLock<()>,
}

impl FileOperationStore {
    /// Opens a store rooted at the given directory, creating the directory
    /// layout when missing.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        for namespace in [PLANS_DIR, OPERATIONS_DIR, EXECUTION_LOGS_DIR] {
            fs::create_dir_all(root.join(namespace))
                .store_err("failed to create store directory")?;
        }

        Ok(Self {
            root,
            lock: RwLock::new(()),
        })
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Removes every stored record. Test support.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock.write().expect("store lock poisoned");
        for namespace in [PLANS_DIR, OPERATIONS_DIR, EXECUTION_LOGS_DIR] {
            let dir = self.root.join(namespace);
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                if entry.path().is_file() {
                    fs::remove_file(entry.path()).store_err("failed to remove record")?;
                }
            }
        }
        Ok(())
    }

    /// Record IDs become filename stems, so anything that could traverse
    /// out of the namespace directory is rejected outright.
    fn validate_id(id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(CuratorError::invalid_input("id", "must not be empty"));
        }
        if id.contains('/') || id.contains('\\') || id.contains("..") {
            return Err(CuratorError::invalid_input(
                "id",
                format!("must not contain path separators: {id}"),
            ));
        }
        Ok(())
    }

    fn record_path(&self, namespace: &str, stem: &str) -> PathBuf {
        self.root.join(namespace).join(format!("{stem}.json"))
    }

    fn write_record<T: Serialize>(&self, namespace: &str, stem: &str, record: &T) -> Result<()> {
        let path = self.record_path(namespace, stem);
        let temp = self.root.join(namespace).join(format!("{stem}.json.tmp"));

        let json = serde_json::to_string_pretty(record)?;
        fs::write(&temp, json).store_err("failed to write record")?;
        fs::rename(&temp, &path).store_err("failed to commit record")
    }

    fn read_record<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let data = fs::read_to_string(path).store_err("failed to read record")?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Reads every parseable record in a namespace, skipping temp files and
    /// anything corrupt or unreadable.
    fn read_all<T: DeserializeOwned>(&self, namespace: &str) -> Result<Vec<T>> {
        let dir = self.root.join(namespace);
        let entries = fs::read_dir(&dir).store_err("failed to read store directory")?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.store_err("failed to read store directory")?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("skipping corrupt record {}: {e}", path.display());
                }
            }
        }
        Ok(records)
    }

    fn execution_status_for(&self, plan_id: &str) -> Option<ExecutionStatus> {
        let path = self.record_path(EXECUTION_LOGS_DIR, plan_id);
        if !path.exists() {
            return None;
        }
        self.read_record::<ExecutionLog>(&path)
            .ok()
            .map(|log| log.status)
    }
}

impl OperationStore for FileOperationStore {
    fn save_plan(&self, plan: &Plan) -> Result<()> {
        Self::validate_id(&plan.id)?;
        let _guard = self.lock.write().expect("store lock poisoned");
        self.write_record(PLANS_DIR, &plan.id, plan)
    }

    fn get_plan(&self, id: &str) -> Result<Plan> {
        Self::validate_id(id)?;
        let _guard = self.lock.read().expect("store lock poisoned");

        let path = self.record_path(PLANS_DIR, id);
        if !path.exists() {
            return Err(CuratorError::PlanNotFound { id: id.to_string() });
        }
        // A record that fails to parse behaves like a missing record.
        self.read_record(&path).map_err(|e| {
            warn!("plan record {id} is unreadable: {e}");
            CuratorError::PlanNotFound { id: id.to_string() }
        })
    }

    fn list_plans(&self) -> Result<Vec<PlanSummary>> {
        let _guard = self.lock.read().expect("store lock poisoned");

        let plans: Vec<Plan> = self.read_all(PLANS_DIR)?;
        let mut summaries: Vec<PlanSummary> = plans
            .iter()
            .map(|plan| PlanSummary::from_plan(plan, self.execution_status_for(&plan.id)))
            .collect();

        summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(summaries)
    }

    fn log_operation(&self, op: &Operation) -> Result<()> {
        Self::validate_id(&op.id)?;
        let _guard = self.lock.write().expect("store lock poisoned");
        self.write_record(OPERATIONS_DIR, &op.id, op)
    }

    fn get_pending_operations(&self) -> Result<Vec<Operation>> {
        let _guard = self.lock.read().expect("store lock poisoned");

        let records: Vec<Operation> = self.read_all(OPERATIONS_DIR)?;

        let completed: std::collections::HashSet<String> = records
            .iter()
            .filter_map(|op| operation::base_operation_id(&op.id).map(str::to_string))
            .collect();

        let mut pending: Vec<Operation> = records
            .into_iter()
            .filter(|op| !op.is_completion_marker() && !completed.contains(&op.id))
            .collect();

        pending.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(pending)
    }

    fn mark_operation_complete(&self, id: &str) -> Result<()> {
        Self::validate_id(id)?;
        let _guard = self.lock.write().expect("store lock poisoned");

        if !self.record_path(OPERATIONS_DIR, id).exists() {
            return Err(CuratorError::OperationNotFound { id: id.to_string() });
        }

        let marker = Operation::completion_marker(id);
        self.write_record(OPERATIONS_DIR, &marker.id, &marker)
    }

    fn save_execution_log(&self, log: &ExecutionLog) -> Result<()> {
        Self::validate_id(&log.plan_id)?;
        let _guard = self.lock.write().expect("store lock poisoned");
        self.write_record(EXECUTION_LOGS_DIR, &log.plan_id, log)
    }

    fn get_execution_history(&self) -> Result<Vec<ExecutionLog>> {
        let _guard = self.lock.read().expect("store lock poisoned");

        let mut logs: Vec<ExecutionLog> = self.read_all(EXECUTION_LOGS_DIR)?;
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(logs)
    }
}
