//! Medigrasp Store
//!
//! This crate provides the shared medicine inventory. The [`MedicineStore`] is
//! the only piece of state shared between the task registry and running grasp
//! workflows:
//! - Seeding / replacing the list (`upsert`)
//! - Snapshot reads (`list`, `list_pending`)
//! - Per-entry status updates (`mark`)
//! - Atomic read-select of the next pending entry (`select_next_pending`)
//!
//! All operations take a single internal lock, so a reader never observes a
//! half-updated list and a select never races a concurrent mark.

mod store;
mod types;

pub use store::MedicineStore;
pub use types::{Medicine, MedicineStatus};

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// No pending entry with the given name exists.
  #[error("no pending medicine named '{0}'")]
  NotFound(String),
}
