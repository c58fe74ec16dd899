//! Registry errors.

/// Errors reported synchronously to registry callers.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
  /// No task with the given id.
  #[error("task not found: {0}")]
  NotFound(String),

  /// The operation conflicts with the task's current state, or with a
  /// grasp task already in flight.
  #[error("conflict: {0}")]
  Conflict(String),

  /// The submission payload does not match the action's required shape.
  #[error("invalid payload: {0}")]
  InvalidPayload(String),
}
