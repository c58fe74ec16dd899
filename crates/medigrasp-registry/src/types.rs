use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The action a task performs.
///
/// Wire form is numeric: 1 = recognize, 2 = grasp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
  Recognize,
  Grasp,
}

impl TaskAction {
  /// Parse the numeric wire form.
  pub fn from_wire(action: u8) -> Option<Self> {
    match action {
      1 => Some(TaskAction::Recognize),
      2 => Some(TaskAction::Grasp),
      _ => None,
    }
  }
}

/// Status of a task. Transitions are monotonic:
/// `Pending -> Processing -> {Completed, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
  Pending,
  Processing,
  Completed,
  Failed,
}

impl TaskStatus {
  /// Whether the task has finished, one way or the other.
  pub fn is_terminal(&self) -> bool {
    matches!(self, TaskStatus::Completed | TaskStatus::Failed)
  }
}

/// A task record as served to callers.
///
/// `result` is present only when `Completed`, `error` only when `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
  pub id: String,
  pub action: TaskAction,
  pub status: TaskStatus,
  pub result: Option<serde_json::Value>,
  pub error: Option<String>,
  pub created_at: DateTime<Utc>,
  pub finished_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
  pub(crate) fn new(id: String, action: TaskAction) -> Self {
    Self {
      id,
      action,
      status: TaskStatus::Pending,
      result: None,
      error: None,
      created_at: Utc::now(),
      finished_at: None,
    }
  }
}
