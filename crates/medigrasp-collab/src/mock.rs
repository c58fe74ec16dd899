//! Scripted collaborator mocks for tests.
//!
//! Each mock holds a queue of outcomes; calls pop the front. Running a mock
//! past the end of its script is reported as a collaborator failure, so a
//! test that under-scripts fails loudly instead of hanging on a default.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::types::{Frame, GraspTarget, Mask, Point};
use crate::{Camera, CollabError, RobotArm, Segmenter, Vision};

/// A small fully-filled mask, convenient for scripting segmentation results.
pub fn filled_mask() -> Mask {
  Mask {
    width: 8,
    height: 8,
    data: vec![1; 64],
  }
}

fn pop<T>(queue: &Mutex<VecDeque<Result<T, String>>>, what: &str) -> Result<T, String> {
  queue
    .lock()
    .unwrap()
    .pop_front()
    .unwrap_or_else(|| Err(format!("no scripted {} outcome left", what)))
}

/// Camera returning a tiny fixed frame, optionally scripted to fail.
#[derive(Debug, Default)]
pub struct MockCamera {
  failures: Mutex<VecDeque<String>>,
}

impl MockCamera {
  pub fn new() -> Self {
    Self::default()
  }

  /// Script the next capture to fail with the given message.
  pub fn fail_next(&self, message: impl Into<String>) {
    self.failures.lock().unwrap().push_back(message.into());
  }
}

#[async_trait]
impl Camera for MockCamera {
  async fn capture(&self) -> Result<Frame, CollabError> {
    if let Some(message) = self.failures.lock().unwrap().pop_front() {
      return Err(CollabError::Camera(message));
    }
    Ok(Frame {
      width: 8,
      height: 8,
      data: vec![0; 64],
    })
  }
}

/// Vision service with scripted recognition and location outcomes.
#[derive(Debug, Default)]
pub struct MockVision {
  recognitions: Mutex<VecDeque<Result<Vec<String>, String>>>,
  locations: Mutex<VecDeque<Result<Point, String>>>,
}

impl MockVision {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push_recognition(&self, outcome: Result<Vec<String>, &str>) {
    self
      .recognitions
      .lock()
      .unwrap()
      .push_back(outcome.map_err(|e| e.to_string()));
  }

  pub fn push_location(&self, outcome: Result<Point, &str>) {
    self
      .locations
      .lock()
      .unwrap()
      .push_back(outcome.map_err(|e| e.to_string()));
  }
}

#[async_trait]
impl Vision for MockVision {
  async fn recognize_prescription(&self, _frame: &Frame) -> Result<Vec<String>, CollabError> {
    pop(&self.recognitions, "recognition").map_err(CollabError::Recognition)
  }

  async fn locate_medicine(&self, _frame: &Frame, _name: &str) -> Result<Point, CollabError> {
    pop(&self.locations, "location").map_err(CollabError::Recognition)
  }
}

/// Segmenter with scripted mask outcomes.
#[derive(Debug, Default)]
pub struct MockSegmenter {
  masks: Mutex<VecDeque<Result<Mask, String>>>,
}

impl MockSegmenter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push_mask(&self, outcome: Result<Mask, &str>) {
    self
      .masks
      .lock()
      .unwrap()
      .push_back(outcome.map_err(|e| e.to_string()));
  }
}

#[async_trait]
impl Segmenter for MockSegmenter {
  async fn segment(&self, _frame: &Frame, _point: Point) -> Result<Mask, CollabError> {
    pop(&self.masks, "segmentation").map_err(CollabError::Segmentation)
  }
}

/// Robot arm with scripted grasp/reset outcomes and call counters.
#[derive(Debug, Default)]
pub struct MockRobotArm {
  grasps: Mutex<VecDeque<Result<(), String>>>,
  resets: Mutex<VecDeque<Result<(), String>>>,
  grasp_calls: AtomicUsize,
  reset_calls: AtomicUsize,
}

impl MockRobotArm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push_grasp(&self, outcome: Result<(), &str>) {
    self
      .grasps
      .lock()
      .unwrap()
      .push_back(outcome.map_err(|e| e.to_string()));
  }

  pub fn push_reset(&self, outcome: Result<(), &str>) {
    self
      .resets
      .lock()
      .unwrap()
      .push_back(outcome.map_err(|e| e.to_string()));
  }

  pub fn grasp_calls(&self) -> usize {
    self.grasp_calls.load(Ordering::SeqCst)
  }

  pub fn reset_calls(&self) -> usize {
    self.reset_calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl RobotArm for MockRobotArm {
  async fn grasp(&self, _target: &GraspTarget) -> Result<(), CollabError> {
    self.grasp_calls.fetch_add(1, Ordering::SeqCst);
    pop(&self.grasps, "grasp").map_err(CollabError::Robot)
  }

  async fn reset(&self) -> Result<(), CollabError> {
    self.reset_calls.fetch_add(1, Ordering::SeqCst);
    pop(&self.resets, "reset").map_err(CollabError::Robot)
  }
}
