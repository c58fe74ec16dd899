//! Medicine list store.

use std::sync::{Arc, Mutex};

use crate::{Medicine, MedicineStatus, StoreError};

/// Shared, lock-protected medicine inventory.
///
/// The handle is cheap to clone; clones share the same underlying list. The
/// registry seeds it and serves snapshot reads, grasp workflows select and
/// mark entries as they work through a prescription.
#[derive(Debug, Clone, Default)]
pub struct MedicineStore {
  inner: Arc<Mutex<Vec<Medicine>>>,
}

impl MedicineStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot of the full list, in insertion order.
  pub fn list(&self) -> Vec<Medicine> {
    self.inner.lock().unwrap().clone()
  }

  /// Snapshot of entries still pending, in insertion order.
  pub fn list_pending(&self) -> Vec<Medicine> {
    self
      .inner
      .lock()
      .unwrap()
      .iter()
      .filter(|m| m.status == MedicineStatus::Pending)
      .cloned()
      .collect()
  }

  /// Replace the list contents.
  ///
  /// Used to seed from a recognized prescription or a direct submission.
  pub fn upsert(&self, medicines: Vec<Medicine>) {
    *self.inner.lock().unwrap() = medicines;
  }

  /// First pending entry in insertion order, read atomically.
  ///
  /// Deterministic across calls as long as no mark happens in between.
  pub fn select_next_pending(&self) -> Option<Medicine> {
    self
      .inner
      .lock()
      .unwrap()
      .iter()
      .find(|m| m.status == MedicineStatus::Pending)
      .cloned()
  }

  /// Update the first pending entry with the given name.
  pub fn mark(&self, name: &str, status: MedicineStatus) -> Result<(), StoreError> {
    let mut list = self.inner.lock().unwrap();
    let entry = list
      .iter_mut()
      .find(|m| m.name == name && m.status == MedicineStatus::Pending)
      .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
    entry.status = status;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn seeded() -> MedicineStore {
    let store = MedicineStore::new();
    store.upsert(vec![
      Medicine::pending("Aspirin"),
      Medicine::pending("Ibuprofen"),
      Medicine::pending("Aspirin"),
    ]);
    store
  }

  #[test]
  fn select_returns_first_pending_in_insertion_order() {
    let store = seeded();
    assert_eq!(store.select_next_pending().unwrap().name, "Aspirin");
    // No mark in between: selection is stable.
    assert_eq!(store.select_next_pending().unwrap().name, "Aspirin");
  }

  #[test]
  fn mark_updates_first_pending_match_only() {
    let store = seeded();
    store.mark("Aspirin", MedicineStatus::Grasped).unwrap();

    let list = store.list();
    assert_eq!(list[0].status, MedicineStatus::Grasped);
    assert_eq!(list[2].status, MedicineStatus::Pending);

    // The duplicate is now the next pending Aspirin.
    store.mark("Aspirin", MedicineStatus::Grasped).unwrap();
    assert_eq!(store.list()[2].status, MedicineStatus::Grasped);
  }

  #[test]
  fn mark_unknown_name_is_not_found() {
    let store = seeded();
    let err = store.mark("Paracetamol", MedicineStatus::Grasped).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
  }

  #[test]
  fn list_pending_excludes_grasped_and_failed() {
    let store = seeded();
    store.mark("Aspirin", MedicineStatus::Grasped).unwrap();
    store.mark("Ibuprofen", MedicineStatus::Failed).unwrap();

    let pending = store.list_pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].name, "Aspirin");
  }

  #[test]
  fn select_on_drained_list_is_none() {
    let store = seeded();
    while let Some(m) = store.select_next_pending() {
      store.mark(&m.name, MedicineStatus::Grasped).unwrap();
    }
    assert!(store.select_next_pending().is_none());
    assert!(store.list_pending().is_empty());
  }
}
