//! Workflow errors.

use medigrasp_machine::MachineError;

/// Errors that can occur running a grasp workflow.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
  /// The workflow reached its ERROR state.
  ///
  /// Collaborator failures never escape a step; they accumulate and surface
  /// here once the transition table has led to ERROR.
  #[error("grasp workflow failed: {message}")]
  StepFailed { message: String },

  /// The state machine itself was misconfigured.
  #[error("workflow configuration error")]
  Machine(#[from] MachineError),
}
