//! Integration tests for the grasp workflow using scripted mock collaborators.

use std::sync::Arc;

use medigrasp_collab::mock::{filled_mask, MockCamera, MockRobotArm, MockSegmenter, MockVision};
use medigrasp_collab::Point;
use medigrasp_store::{Medicine, MedicineStatus, MedicineStore};
use medigrasp_workflow::{Collaborators, GraspWorkflow, WorkflowError};

struct Rig {
  camera: Arc<MockCamera>,
  vision: Arc<MockVision>,
  segmenter: Arc<MockSegmenter>,
  robot: Arc<MockRobotArm>,
  store: MedicineStore,
}

impl Rig {
  fn new() -> Self {
    Self {
      camera: Arc::new(MockCamera::new()),
      vision: Arc::new(MockVision::new()),
      segmenter: Arc::new(MockSegmenter::new()),
      robot: Arc::new(MockRobotArm::new()),
      store: MedicineStore::new(),
    }
  }

  fn workflow(&self) -> GraspWorkflow {
    GraspWorkflow::new(
      Collaborators {
        camera: self.camera.clone(),
        vision: self.vision.clone(),
        segmenter: self.segmenter.clone(),
        robot: self.robot.clone(),
      },
      self.store.clone(),
    )
  }

  /// Script one full successful pass over the current medicine.
  fn script_happy_medicine(&self) {
    self.vision.push_location(Ok(Point::new(4, 4)));
    self.segmenter.push_mask(Ok(filled_mask()));
    self.robot.push_grasp(Ok(()));
    self.robot.push_reset(Ok(()));
  }
}

#[tokio::test]
async fn seeded_run_grasps_all_medicines() {
  let rig = Rig::new();
  rig.store.upsert(vec![
    Medicine::pending("A"),
    Medicine::pending("B"),
  ]);
  rig.script_happy_medicine();
  rig.script_happy_medicine();

  let result = rig.workflow().run().await.expect("workflow should finish");

  assert_eq!(result.len(), 2);
  assert!(result.iter().all(|m| m.status == MedicineStatus::Grasped));
  assert_eq!(rig.robot.grasp_calls(), 2);
  assert_eq!(rig.robot.reset_calls(), 2);
  assert!(rig.store.list_pending().is_empty());
}

#[tokio::test]
async fn unseeded_run_recognizes_then_grasps() {
  let rig = Rig::new();
  rig
    .vision
    .push_recognition(Ok(vec!["Aspirin".to_string(), "Ibuprofen".to_string()]));
  rig.script_happy_medicine();
  rig.script_happy_medicine();

  let result = rig.workflow().run().await.expect("workflow should finish");

  let names: Vec<&str> = result.iter().map(|m| m.name.as_str()).collect();
  assert_eq!(names, vec!["Aspirin", "Ibuprofen"]);
  assert!(result.iter().all(|m| m.status == MedicineStatus::Grasped));
}

#[tokio::test]
async fn empty_recognition_result_is_an_error() {
  let rig = Rig::new();
  rig.vision.push_recognition(Ok(vec![]));

  let message = match rig.workflow().run().await.unwrap_err() {
    WorkflowError::StepFailed { message } => message,
    other => panic!("expected StepFailed, got {:?}", other),
  };
  assert!(message.contains("no medicines recognized"));
}

#[tokio::test]
async fn segmentation_failure_reaches_error_and_leaves_medicine_pending() {
  let rig = Rig::new();
  rig.store.upsert(vec![Medicine::pending("A")]);
  rig.vision.push_location(Ok(Point::new(4, 4)));
  rig.segmenter.push_mask(Err("model produced no mask"));

  let message = match rig.workflow().run().await.unwrap_err() {
    WorkflowError::StepFailed { message } => message,
    other => panic!("expected StepFailed, got {:?}", other),
  };
  assert!(!message.is_empty());
  assert!(message.contains("segmentation"));

  // The medicine was never grasped.
  let list = rig.store.list();
  assert_eq!(list[0].status, MedicineStatus::Pending);
  assert_eq!(rig.robot.grasp_calls(), 0);
}

#[tokio::test]
async fn empty_mask_is_a_segmentation_failure() {
  let rig = Rig::new();
  rig.store.upsert(vec![Medicine::pending("A")]);
  rig.vision.push_location(Ok(Point::new(4, 4)));
  rig.segmenter.push_mask(Ok(medigrasp_collab::Mask {
    width: 8,
    height: 8,
    data: vec![0; 64],
  }));

  let err = rig.workflow().run().await.unwrap_err();
  assert!(err.to_string().contains("empty mask"));
}

#[tokio::test]
async fn grasp_failure_reaches_error() {
  let rig = Rig::new();
  rig.store.upsert(vec![Medicine::pending("A")]);
  rig.vision.push_location(Ok(Point::new(4, 4)));
  rig.segmenter.push_mask(Ok(filled_mask()));
  rig.robot.push_grasp(Err("suction lost"));

  let err = rig.workflow().run().await.unwrap_err();
  assert!(err.to_string().contains("grasping"));
  assert_eq!(rig.store.list()[0].status, MedicineStatus::Pending);
}

#[tokio::test]
async fn reset_failure_reaches_error_without_marking() {
  let rig = Rig::new();
  rig.store.upsert(vec![Medicine::pending("A")]);
  rig.vision.push_location(Ok(Point::new(4, 4)));
  rig.segmenter.push_mask(Ok(filled_mask()));
  rig.robot.push_grasp(Ok(()));
  rig.robot.push_reset(Err("joint limit"));

  let err = rig.workflow().run().await.unwrap_err();
  assert!(err.to_string().contains("resetting"));
  assert_eq!(rig.store.list()[0].status, MedicineStatus::Pending);
}

#[tokio::test]
async fn capture_failure_on_display_reaches_error() {
  let rig = Rig::new();
  rig.camera.fail_next("camera disconnected");

  let err = rig.workflow().run().await.unwrap_err();
  assert!(err.to_string().contains("prescription capture"));
}

#[tokio::test]
async fn partial_failure_keeps_earlier_medicines_grasped() {
  let rig = Rig::new();
  rig.store.upsert(vec![
    Medicine::pending("A"),
    Medicine::pending("B"),
  ]);
  rig.script_happy_medicine();
  // Second medicine fails at point selection.
  rig.vision.push_location(Err("not visible"));

  let err = rig.workflow().run().await.unwrap_err();
  assert!(err.to_string().contains("point selection"));

  let list = rig.store.list();
  assert_eq!(list[0].status, MedicineStatus::Grasped);
  assert_eq!(list[1].status, MedicineStatus::Pending);
}
