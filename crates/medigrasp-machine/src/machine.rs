//! State machine executor.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use futures::future::BoxFuture;
use tracing::{debug, error};

use crate::error::MachineError;

/// A step handler: borrows the workflow context, returns a boolean outcome.
pub type StepFn<C> = Box<dyn for<'a> Fn(&'a mut C) -> BoxFuture<'a, bool> + Send + Sync>;

/// Table-driven state machine over states `S` and context `C`.
///
/// Built once by the workflow owner: register a handler per non-terminal
/// state, a transition per `(state, outcome)` pair, and the terminal states.
/// `run` then loops handler -> outcome -> table lookup until a terminal state.
pub struct StateMachine<S, C> {
  current_state: S,
  handlers: HashMap<S, StepFn<C>>,
  transitions: HashMap<(S, bool), S>,
  terminal: HashSet<S>,
}

impl<S, C> StateMachine<S, C>
where
  S: Copy + Eq + Hash + Debug + Send,
  C: Send,
{
  /// Create a machine starting in `initial`.
  pub fn new(initial: S) -> Self {
    Self {
      current_state: initial,
      handlers: HashMap::new(),
      transitions: HashMap::new(),
      terminal: HashSet::new(),
    }
  }

  /// Register the step handler for a state.
  pub fn register_handler(&mut self, state: S, handler: StepFn<C>) {
    self.handlers.insert(state, handler);
  }

  /// Add a transition table entry: `(from, outcome) -> to`.
  pub fn add_transition(&mut self, from: S, outcome: bool, to: S) {
    self.transitions.insert((from, outcome), to);
  }

  /// Mark a state as terminal. `run` stops when it reaches one.
  pub fn mark_terminal(&mut self, state: S) {
    self.terminal.insert(state);
  }

  /// Get the current state.
  pub fn state(&self) -> S {
    self.current_state
  }

  /// Drive the context until a terminal state is reached.
  ///
  /// Each iteration invokes the current state's handler, then looks up the
  /// observed `(state, outcome)` pair in the transition table. Returns the
  /// terminal state reached.
  ///
  /// # Errors
  /// Returns [`MachineError`] if the current state has no handler or the
  /// observed pair has no table entry.
  pub async fn run(&mut self, ctx: &mut C) -> Result<S, MachineError> {
    while !self.terminal.contains(&self.current_state) {
      let state = self.current_state;
      let handler = self.handlers.get(&state).ok_or_else(|| {
        error!(state = ?state, "no handler registered");
        MachineError::MissingHandler {
          state: format!("{:?}", state),
        }
      })?;

      let outcome = handler(ctx).await;

      let next = *self
        .transitions
        .get(&(state, outcome))
        .ok_or_else(|| {
          error!(state = ?state, outcome, "no transition table entry");
          MachineError::MissingTransition {
            state: format!("{:?}", state),
            outcome,
          }
        })?;

      debug!(from = ?state, outcome, to = ?next, "state transition");
      self.current_state = next;
    }

    Ok(self.current_state)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use futures::FutureExt;

  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
  enum Toy {
    Start,
    Middle,
    Done,
    Broken,
  }

  struct Counter {
    steps: u32,
    fail_middle: bool,
  }

  fn start_step(ctx: &mut Counter) -> futures::future::BoxFuture<'_, bool> {
    async move {
      ctx.steps += 1;
      true
    }
    .boxed()
  }

  fn middle_step(ctx: &mut Counter) -> futures::future::BoxFuture<'_, bool> {
    async move {
      ctx.steps += 1;
      !ctx.fail_middle
    }
    .boxed()
  }

  fn machine() -> StateMachine<Toy, Counter> {
    let mut m = StateMachine::new(Toy::Start);
    m.register_handler(Toy::Start, Box::new(start_step));
    m.register_handler(Toy::Middle, Box::new(middle_step));
    m.add_transition(Toy::Start, true, Toy::Middle);
    m.add_transition(Toy::Middle, true, Toy::Done);
    m.add_transition(Toy::Middle, false, Toy::Broken);
    m.mark_terminal(Toy::Done);
    m.mark_terminal(Toy::Broken);
    m
  }

  #[tokio::test]
  async fn runs_to_success_terminal() {
    let mut ctx = Counter {
      steps: 0,
      fail_middle: false,
    };
    let mut m = machine();
    let end = m.run(&mut ctx).await.unwrap();
    assert_eq!(end, Toy::Done);
    assert_eq!(ctx.steps, 2);
  }

  #[tokio::test]
  async fn failure_outcome_follows_failure_edge() {
    let mut ctx = Counter {
      steps: 0,
      fail_middle: true,
    };
    let mut m = machine();
    let end = m.run(&mut ctx).await.unwrap();
    assert_eq!(end, Toy::Broken);
  }

  #[tokio::test]
  async fn missing_transition_fails_fast() {
    let mut ctx = Counter {
      steps: 0,
      fail_middle: true,
    };
    let mut m = machine();
    // Remove the failure edge out of Middle.
    m.transitions.remove(&(Toy::Middle, false));
    let err = m.run(&mut ctx).await.unwrap_err();
    assert!(matches!(err, MachineError::MissingTransition { outcome: false, .. }));
  }

  #[tokio::test]
  async fn missing_handler_fails_fast() {
    let mut ctx = Counter {
      steps: 0,
      fail_middle: false,
    };
    let mut m = machine();
    m.handlers.remove(&Toy::Middle);
    let err = m.run(&mut ctx).await.unwrap_err();
    assert!(matches!(err, MachineError::MissingHandler { .. }));
  }

  #[tokio::test]
  async fn terminal_initial_state_runs_no_handlers() {
    let mut ctx = Counter {
      steps: 0,
      fail_middle: false,
    };
    let mut m = StateMachine::<Toy, Counter>::new(Toy::Done);
    m.mark_terminal(Toy::Done);
    let end = m.run(&mut ctx).await.unwrap();
    assert_eq!(end, Toy::Done);
    assert_eq!(ctx.steps, 0);
  }
}
