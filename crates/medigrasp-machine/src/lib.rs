//! Medigrasp Machine
//!
//! A small, generic state machine executor. A [`StateMachine`] holds a step
//! handler per state and a transition table keyed by `(state, outcome)`.
//! [`StateMachine::run`] drives a context through handlers until a terminal
//! state is reached.
//!
//! Handlers report a boolean outcome rather than an error: any failure inside
//! a step is the step's own business to capture, what the machine sees is
//! success or failure and the table decides where that leads. A missing table
//! entry or handler is a configuration defect and aborts the run instead of
//! guessing a transition.

mod error;
mod machine;

pub use error::MachineError;
pub use machine::{StateMachine, StepFn};
