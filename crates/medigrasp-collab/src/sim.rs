//! Deterministic in-process collaborator stand-ins.
//!
//! These back the CLI when no real hardware or models are attached: a fixed
//! synthetic frame, a configurable prescription, a square mask around the
//! requested point, and an arm that always succeeds.

use async_trait::async_trait;
use tracing::info;

use crate::types::{Frame, GraspTarget, Mask, Point};
use crate::{Camera, CollabError, RobotArm, Segmenter, Vision};

const FRAME_WIDTH: u32 = 640;
const FRAME_HEIGHT: u32 = 480;

/// Camera producing a fixed gray frame.
#[derive(Debug, Default)]
pub struct SimCamera;

#[async_trait]
impl Camera for SimCamera {
  async fn capture(&self) -> Result<Frame, CollabError> {
    Ok(Frame {
      width: FRAME_WIDTH,
      height: FRAME_HEIGHT,
      data: vec![128; (FRAME_WIDTH * FRAME_HEIGHT) as usize],
    })
  }
}

/// Vision service with a fixed prescription and centered locations.
#[derive(Debug)]
pub struct SimVision {
  medicines: Vec<String>,
}

impl SimVision {
  pub fn new(medicines: Vec<String>) -> Self {
    Self { medicines }
  }
}

impl Default for SimVision {
  fn default() -> Self {
    Self::new(vec![
      "Aspirin".to_string(),
      "Ibuprofen".to_string(),
      "Vitamin C".to_string(),
    ])
  }
}

#[async_trait]
impl Vision for SimVision {
  async fn recognize_prescription(&self, _frame: &Frame) -> Result<Vec<String>, CollabError> {
    info!(medicines = ?self.medicines, "simulated prescription recognition");
    Ok(self.medicines.clone())
  }

  async fn locate_medicine(&self, frame: &Frame, name: &str) -> Result<Point, CollabError> {
    info!(name, "simulated medicine location");
    Ok(Point::new(frame.width / 2, frame.height / 2))
  }
}

/// Segmenter producing a filled square around the requested point.
#[derive(Debug, Default)]
pub struct SimSegmenter;

#[async_trait]
impl Segmenter for SimSegmenter {
  async fn segment(&self, frame: &Frame, point: Point) -> Result<Mask, CollabError> {
    let mut data = vec![0u8; (frame.width * frame.height) as usize];
    let half = 20u32;
    let x0 = point.x.saturating_sub(half);
    let y0 = point.y.saturating_sub(half);
    let x1 = (point.x + half).min(frame.width - 1);
    let y1 = (point.y + half).min(frame.height - 1);
    for y in y0..=y1 {
      for x in x0..=x1 {
        data[(y * frame.width + x) as usize] = 1;
      }
    }
    Ok(Mask {
      width: frame.width,
      height: frame.height,
      data,
    })
  }
}

/// Robot arm that always succeeds.
#[derive(Debug, Default)]
pub struct SimRobotArm;

#[async_trait]
impl RobotArm for SimRobotArm {
  async fn grasp(&self, target: &GraspTarget) -> Result<(), CollabError> {
    info!(x = target.x, y = target.y, z = target.z, "simulated grasp");
    Ok(())
  }

  async fn reset(&self) -> Result<(), CollabError> {
    info!("simulated arm reset");
    Ok(())
  }
}
