//! Medigrasp Workflow
//!
//! The grasp workflow: one run takes a prescription from display through
//! recognition, then loops medicine by medicine through point selection,
//! segmentation, grasping and arm reset, until the pending list is drained
//! (FINISHED) or a step fails (ERROR).
//!
//! The workflow is a concrete instantiation of the
//! [`medigrasp_machine::StateMachine`] executor: each state has one handler
//! that calls a single collaborator, and the transition table decides where
//! each boolean outcome leads.

mod error;
mod state;
mod workflow;

pub use error::WorkflowError;
pub use state::GraspState;
pub use workflow::{Collaborators, GraspWorkflow};
