//! Collaborator traits.

use async_trait::async_trait;

use crate::types::{Frame, GraspTarget, Mask, Point};
use crate::CollabError;

/// Image source for both the prescription and workspace views.
#[async_trait]
pub trait Camera: Send + Sync {
  /// Capture one frame.
  async fn capture(&self) -> Result<Frame, CollabError>;
}

/// Vision-language recognition service.
#[async_trait]
pub trait Vision: Send + Sync {
  /// Extract the medicine names from a prescription image.
  async fn recognize_prescription(&self, frame: &Frame) -> Result<Vec<String>, CollabError>;

  /// Locate a named medicine in a workspace image, returning a pixel
  /// coordinate inside its box.
  async fn locate_medicine(&self, frame: &Frame, name: &str) -> Result<Point, CollabError>;
}

/// Segmentation model.
#[async_trait]
pub trait Segmenter: Send + Sync {
  /// Segment the object at `point` in `frame`.
  async fn segment(&self, frame: &Frame, point: Point) -> Result<Mask, CollabError>;
}

/// Robot arm controller.
#[async_trait]
pub trait RobotArm: Send + Sync {
  /// Execute a grasp at the given target and verify it.
  async fn grasp(&self, target: &GraspTarget) -> Result<(), CollabError>;

  /// Return the arm to its safe pose.
  async fn reset(&self) -> Result<(), CollabError>;
}
