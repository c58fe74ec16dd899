use serde::{Deserialize, Serialize};

/// Status of one medicine on the prescription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicineStatus {
  Pending,
  Grasped,
  Failed,
}

/// One medicine on the prescription list.
///
/// Names are not required to be unique; duplicate entries mean the same
/// medicine has to be picked more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
  pub name: String,
  #[serde(default = "MedicineStatus::pending")]
  pub status: MedicineStatus,
}

impl MedicineStatus {
  fn pending() -> Self {
    MedicineStatus::Pending
  }
}

impl Medicine {
  /// Create a new pending entry.
  pub fn pending(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      status: MedicineStatus::Pending,
    }
  }
}
