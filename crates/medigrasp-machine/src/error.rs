//! Executor errors.

/// Errors that can occur while driving a state machine.
///
/// Both variants are configuration defects: the machine was built without a
/// handler or transition it turned out to need. Neither is recoverable at
/// runtime.
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
  /// No handler registered for the current state.
  #[error("no handler registered for state {state}")]
  MissingHandler { state: String },

  /// No transition table entry for the observed `(state, outcome)` pair.
  #[error("no transition from state {state} with outcome {outcome}")]
  MissingTransition { state: String, outcome: bool },
}
