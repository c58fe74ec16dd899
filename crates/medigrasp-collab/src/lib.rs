//! Medigrasp Collab
//!
//! Trait seams for the external collaborators the orchestration core calls
//! but does not implement: the camera, the vision-language recognition
//! service, the segmentation model, and the robot arm controller.
//!
//! The workflow only ever holds `Arc<dyn Trait>` handles. Two sets of
//! implementations ship here:
//! - [`sim`] — deterministic in-process stand-ins used by the CLI.
//! - [`mock`] — scripted mocks with queued outcomes, for tests.

pub mod mock;
pub mod sim;
mod traits;
mod types;

pub use traits::{Camera, RobotArm, Segmenter, Vision};
pub use types::{Frame, GraspTarget, Mask, Point};

/// Error type for collaborator calls.
///
/// A failed or unusable result from any collaborator surfaces as one of
/// these; workflow steps capture them and convert them into a failure
/// outcome rather than letting them escape.
#[derive(Debug, thiserror::Error)]
pub enum CollabError {
  /// The camera could not produce a frame.
  #[error("camera failure: {0}")]
  Camera(String),

  /// Recognition failed or returned an unusable result.
  #[error("recognition failure: {0}")]
  Recognition(String),

  /// Segmentation failed or produced an empty mask.
  #[error("segmentation failure: {0}")]
  Segmentation(String),

  /// A robot arm motion failed.
  #[error("robot failure: {0}")]
  Robot(String),
}
