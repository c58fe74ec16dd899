//! Task registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use medigrasp_store::{Medicine, MedicineStore};
use medigrasp_workflow::{Collaborators, GraspWorkflow};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::error::RegistryError;
use crate::types::{TaskAction, TaskRecord, TaskStatus};

/// Per-submission options.
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
  /// Action payload. For grasp tasks, an optional seed medicine list
  /// (a bare array or `{"medicines": [...]}`); recognition takes none.
  pub payload: serde_json::Value,
  /// Force the task to FAILED if it runs longer than this.
  pub timeout_ms: Option<u64>,
}

struct Inner {
  records: Mutex<HashMap<String, TaskRecord>>,
  store: MedicineStore,
  collab: Collaborators,
  cancel: CancellationToken,
}

/// The task registry.
///
/// Cheap to clone; clones share the same records, store and collaborators.
/// Each submission spawns one tokio task; bookkeeping is guarded by a single
/// lock so snapshots are never half-updated and deletes never race a status
/// transition.
#[derive(Clone)]
pub struct TaskRegistry {
  inner: Arc<Inner>,
}

impl TaskRegistry {
  /// Create a registry over the given collaborators and medicine store.
  pub fn new(collab: Collaborators, store: MedicineStore) -> Self {
    Self {
      inner: Arc::new(Inner {
        records: Mutex::new(HashMap::new()),
        store,
        collab,
        cancel: CancellationToken::new(),
      }),
    }
  }

  /// Cancel all in-flight tasks. They finish as FAILED.
  pub fn shutdown(&self) {
    self.inner.cancel.cancel();
  }

  /// Snapshot of the pending medicine list.
  pub fn pending_medicines(&self) -> Vec<Medicine> {
    self.inner.store.list_pending()
  }

  /// Submit a task and schedule its execution.
  ///
  /// Returns the fresh task id immediately; the job runs on its own spawned
  /// task. A grasp submission is rejected with `Conflict` while another
  /// grasp task is still pending or processing.
  #[instrument(name = "task_submit", skip(self, options))]
  pub fn submit(
    &self,
    action: TaskAction,
    options: SubmitOptions,
  ) -> Result<String, RegistryError> {
    let seeds = validate_payload(action, &options.payload)?;
    let id = uuid::Uuid::new_v4().to_string();

    {
      let mut records = self.inner.records.lock().unwrap();
      if action == TaskAction::Grasp {
        let in_flight = records
          .values()
          .any(|r| r.action == TaskAction::Grasp && !r.status.is_terminal());
        if in_flight {
          return Err(RegistryError::Conflict(
            "a grasp task is already in flight".to_string(),
          ));
        }
      }
      records.insert(id.clone(), TaskRecord::new(id.clone(), action));
    }

    info!(task_id = %id, ?action, "task submitted");

    let registry = self.clone();
    let task_id = id.clone();
    let timeout_ms = options.timeout_ms;
    tokio::spawn(async move {
      registry.execute(task_id, action, seeds, timeout_ms).await;
    });

    Ok(id)
  }

  /// Consistent snapshot of a task record.
  pub fn get_status(&self, task_id: &str) -> Result<TaskRecord, RegistryError> {
    self
      .inner
      .records
      .lock()
      .unwrap()
      .get(task_id)
      .cloned()
      .ok_or_else(|| RegistryError::NotFound(task_id.to_string()))
  }

  /// Remove a terminal task record.
  pub fn delete(&self, task_id: &str) -> Result<(), RegistryError> {
    let mut records = self.inner.records.lock().unwrap();
    let record = records
      .get(task_id)
      .ok_or_else(|| RegistryError::NotFound(task_id.to_string()))?;
    if !record.status.is_terminal() {
      return Err(RegistryError::Conflict(format!(
        "task {} is still {:?}",
        task_id, record.status
      )));
    }
    records.remove(task_id);
    Ok(())
  }

  /// Execution path: PROCESSING, run the handler, record the outcome.
  #[instrument(name = "task_execute", skip(self, seeds, timeout_ms))]
  async fn execute(
    &self,
    task_id: String,
    action: TaskAction,
    seeds: Option<Vec<Medicine>>,
    timeout_ms: Option<u64>,
  ) {
    if !self.mark_processing(&task_id) {
      warn!(task_id = %task_id, "record vanished before execution");
      return;
    }
    info!(task_id = %task_id, "task started");

    let handler = self.run_action(action, seeds);
    let outcome = tokio::select! {
      result = async {
        match timeout_ms {
          Some(ms) => match tokio::time::timeout(Duration::from_millis(ms), handler).await {
            Ok(result) => result,
            Err(_) => Err(format!("task timed out after {}ms", ms)),
          },
          None => handler.await,
        }
      } => result,
      _ = self.inner.cancel.cancelled() => Err("task cancelled".to_string()),
    };

    match &outcome {
      Ok(_) => info!(task_id = %task_id, "task completed"),
      Err(e) => error!(task_id = %task_id, error = %e, "task failed"),
    }
    self.finish(&task_id, outcome);
  }

  /// Run the action's handler. All failures come back as the error string
  /// stored on the FAILED record.
  async fn run_action(
    &self,
    action: TaskAction,
    seeds: Option<Vec<Medicine>>,
  ) -> Result<serde_json::Value, String> {
    match action {
      TaskAction::Recognize => {
        let frame = self
          .inner
          .collab
          .camera
          .capture()
          .await
          .map_err(|e| e.to_string())?;
        let names = self
          .inner
          .collab
          .vision
          .recognize_prescription(&frame)
          .await
          .map_err(|e| e.to_string())?;
        // Recognition results seed the shared list for a later grasp task.
        self
          .inner
          .store
          .upsert(names.iter().cloned().map(Medicine::pending).collect());
        Ok(serde_json::json!(names))
      }
      TaskAction::Grasp => {
        if let Some(seeds) = seeds {
          self.inner.store.upsert(seeds);
        }
        let workflow = GraspWorkflow::new(self.inner.collab.clone(), self.inner.store.clone());
        let medicines = workflow.run().await.map_err(|e| e.to_string())?;
        serde_json::to_value(medicines).map_err(|e| e.to_string())
      }
    }
  }

  fn mark_processing(&self, task_id: &str) -> bool {
    let mut records = self.inner.records.lock().unwrap();
    match records.get_mut(task_id) {
      Some(record) if record.status == TaskStatus::Pending => {
        record.status = TaskStatus::Processing;
        true
      }
      _ => false,
    }
  }

  fn finish(&self, task_id: &str, outcome: Result<serde_json::Value, String>) {
    let mut records = self.inner.records.lock().unwrap();
    let Some(record) = records.get_mut(task_id) else {
      return;
    };
    // Status moves forward only.
    if record.status != TaskStatus::Processing {
      return;
    }
    match outcome {
      Ok(result) => {
        record.status = TaskStatus::Completed;
        record.result = Some(result);
      }
      Err(message) => {
        record.status = TaskStatus::Failed;
        record.error = Some(message);
      }
    }
    record.finished_at = Some(chrono::Utc::now());
  }
}

/// Check the payload shape for the action, extracting grasp seeds.
fn validate_payload(
  action: TaskAction,
  payload: &serde_json::Value,
) -> Result<Option<Vec<Medicine>>, RegistryError> {
  match action {
    TaskAction::Recognize => {
      if payload.is_null() {
        Ok(None)
      } else {
        Err(RegistryError::InvalidPayload(
          "recognition takes no payload".to_string(),
        ))
      }
    }
    TaskAction::Grasp => {
      if payload.is_null() {
        return Ok(None);
      }
      let list = match payload {
        serde_json::Value::Array(_) => payload.clone(),
        serde_json::Value::Object(map) => map
          .get("medicines")
          .cloned()
          .ok_or_else(|| {
            RegistryError::InvalidPayload("expected a 'medicines' list".to_string())
          })?,
        _ => {
          return Err(RegistryError::InvalidPayload(
            "expected a medicine list or null".to_string(),
          ));
        }
      };
      let medicines: Vec<Medicine> = serde_json::from_value(list)
        .map_err(|e| RegistryError::InvalidPayload(e.to_string()))?;
      Ok(Some(medicines))
    }
  }
}
