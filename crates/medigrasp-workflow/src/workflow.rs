//! Grasp workflow execution.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use medigrasp_collab::{Camera, Frame, GraspTarget, Mask, Point, RobotArm, Segmenter, Vision};
use medigrasp_machine::StateMachine;
use medigrasp_store::{Medicine, MedicineStatus, MedicineStore};
use tracing::{error, info, instrument, warn};

use crate::error::WorkflowError;
use crate::state::GraspState;

/// The collaborator handles one workflow run calls into.
#[derive(Clone)]
pub struct Collaborators {
  pub camera: Arc<dyn Camera>,
  pub vision: Arc<dyn Vision>,
  pub segmenter: Arc<dyn Segmenter>,
  pub robot: Arc<dyn RobotArm>,
}

/// One run of the grasp state machine.
///
/// Owns the transient working data each state produces for the next; the
/// medicine store is shared with the registry, everything else is private to
/// this instance. At most one medicine is selected at a time.
pub struct GraspWorkflow {
  collab: Collaborators,
  store: MedicineStore,

  frame: Option<Frame>,
  current_medicine: Option<String>,
  selected_point: Option<Point>,
  segmentation_mask: Option<Mask>,
  grasp_target: Option<GraspTarget>,
  errors: Vec<String>,
}

/// Build the transition table of the grasp workflow.
///
/// Medicine-selection failure means "no medicines left" and finishes the run;
/// every other failure is terminal.
fn transition_table(machine: &mut StateMachine<GraspState, GraspWorkflow>) {
  use GraspState::*;

  machine.add_transition(PrescriptionDisplay, true, PrescriptionRecognition);
  machine.add_transition(PrescriptionDisplay, false, Error);
  machine.add_transition(PrescriptionRecognition, true, MedicineSelection);
  machine.add_transition(PrescriptionRecognition, false, Error);
  machine.add_transition(MedicineSelection, true, PointSelection);
  machine.add_transition(MedicineSelection, false, Finished);
  machine.add_transition(PointSelection, true, Segmentation);
  machine.add_transition(PointSelection, false, Error);
  machine.add_transition(Segmentation, true, Grasping);
  machine.add_transition(Segmentation, false, Error);
  machine.add_transition(Grasping, true, Resetting);
  machine.add_transition(Grasping, false, Error);
  machine.add_transition(Resetting, true, MedicineSelection);
  machine.add_transition(Resetting, false, Error);

  machine.mark_terminal(Finished);
  machine.mark_terminal(Error);
}

fn display_step(wf: &mut GraspWorkflow) -> BoxFuture<'_, bool> {
  wf.step_display().boxed()
}

fn recognition_step(wf: &mut GraspWorkflow) -> BoxFuture<'_, bool> {
  wf.step_recognition().boxed()
}

fn selection_step(wf: &mut GraspWorkflow) -> BoxFuture<'_, bool> {
  wf.step_select_medicine().boxed()
}

fn point_step(wf: &mut GraspWorkflow) -> BoxFuture<'_, bool> {
  wf.step_select_point().boxed()
}

fn segmentation_step(wf: &mut GraspWorkflow) -> BoxFuture<'_, bool> {
  wf.step_segment().boxed()
}

fn grasping_step(wf: &mut GraspWorkflow) -> BoxFuture<'_, bool> {
  wf.step_grasp().boxed()
}

fn resetting_step(wf: &mut GraspWorkflow) -> BoxFuture<'_, bool> {
  wf.step_reset().boxed()
}

impl GraspWorkflow {
  /// Create a workflow run against the given collaborators and store.
  pub fn new(collab: Collaborators, store: MedicineStore) -> Self {
    Self {
      collab,
      store,
      frame: None,
      current_medicine: None,
      selected_point: None,
      segmentation_mask: None,
      grasp_target: None,
      errors: Vec::new(),
    }
  }

  /// Run the workflow to a terminal state.
  ///
  /// A store that already holds pending medicines is resumed at medicine
  /// selection; otherwise the run starts from prescription display. Returns
  /// the final medicine list on FINISHED, or the accumulated failure
  /// description if the run ends in ERROR.
  #[instrument(name = "grasp_workflow", skip(self))]
  pub async fn run(mut self) -> Result<Vec<Medicine>, WorkflowError> {
    let initial = if self.store.list_pending().is_empty() {
      GraspState::PrescriptionDisplay
    } else {
      info!("store already seeded, resuming at medicine selection");
      GraspState::MedicineSelection
    };

    let mut machine = StateMachine::new(initial);
    machine.register_handler(GraspState::PrescriptionDisplay, Box::new(display_step));
    machine.register_handler(GraspState::PrescriptionRecognition, Box::new(recognition_step));
    machine.register_handler(GraspState::MedicineSelection, Box::new(selection_step));
    machine.register_handler(GraspState::PointSelection, Box::new(point_step));
    machine.register_handler(GraspState::Segmentation, Box::new(segmentation_step));
    machine.register_handler(GraspState::Grasping, Box::new(grasping_step));
    machine.register_handler(GraspState::Resetting, Box::new(resetting_step));
    transition_table(&mut machine);

    let terminal = machine.run(&mut self).await?;

    match terminal {
      GraspState::Finished => {
        info!("grasp workflow finished");
        Ok(self.store.list())
      }
      _ => {
        let message = if self.errors.is_empty() {
          "workflow entered error state".to_string()
        } else {
          self.errors.join("; ")
        };
        error!(error = %message, "grasp workflow failed");
        Err(WorkflowError::StepFailed { message })
      }
    }
  }

  fn fail(&mut self, message: String) -> bool {
    warn!(error = %message, "workflow step failed");
    self.errors.push(message);
    false
  }

  /// PRESCRIPTION_DISPLAY: capture the confirmed prescription image.
  async fn step_display(&mut self) -> bool {
    match self.collab.camera.capture().await {
      Ok(frame) => {
        self.frame = Some(frame);
        true
      }
      Err(e) => self.fail(format!("prescription capture: {}", e)),
    }
  }

  /// PRESCRIPTION_RECOGNITION: extract the medicine list, seed the store.
  async fn step_recognition(&mut self) -> bool {
    // The prescription image is not needed downstream.
    let Some(frame) = self.frame.take() else {
      return self.fail("prescription recognition: no captured image".to_string());
    };

    let names = match self.collab.vision.recognize_prescription(&frame).await {
      Ok(names) => names,
      Err(e) => return self.fail(format!("prescription recognition: {}", e)),
    };
    if names.is_empty() {
      return self.fail("prescription recognition: no medicines recognized".to_string());
    }

    info!(medicines = ?names, "prescription recognized");
    self
      .store
      .upsert(names.into_iter().map(Medicine::pending).collect());
    true
  }

  /// MEDICINE_SELECTION: pick the next pending medicine.
  ///
  /// A failure outcome here is not an error, it means the list is drained
  /// and the table routes to FINISHED.
  async fn step_select_medicine(&mut self) -> bool {
    match self.store.select_next_pending() {
      Some(medicine) => {
        info!(medicine = %medicine.name, "selected next medicine");
        self.current_medicine = Some(medicine.name);
        true
      }
      None => {
        info!("no pending medicines left");
        false
      }
    }
  }

  /// POINT_SELECTION: locate the selected medicine in a fresh workspace image.
  async fn step_select_point(&mut self) -> bool {
    let Some(name) = self.current_medicine.clone() else {
      return self.fail("point selection: no medicine selected".to_string());
    };

    let frame = match self.collab.camera.capture().await {
      Ok(frame) => frame,
      Err(e) => return self.fail(format!("point selection: {}", e)),
    };
    match self.collab.vision.locate_medicine(&frame, &name).await {
      Ok(point) => {
        info!(medicine = %name, x = point.x, y = point.y, "medicine located");
        self.frame = Some(frame);
        self.selected_point = Some(point);
        true
      }
      Err(e) => self.fail(format!("point selection: {}", e)),
    }
  }

  /// SEGMENTATION: segment at the selected point, derive the grasp target.
  async fn step_segment(&mut self) -> bool {
    // Both inputs are consumed here; nothing downstream reads them.
    let (Some(frame), Some(point)) = (self.frame.take(), self.selected_point.take()) else {
      return self.fail("segmentation: missing image or point".to_string());
    };

    let mask = match self.collab.segmenter.segment(&frame, point).await {
      Ok(mask) => mask,
      Err(e) => return self.fail(format!("segmentation: {}", e)),
    };
    let Some(target) = GraspTarget::from_mask(&mask) else {
      return self.fail("segmentation: empty mask".to_string());
    };

    info!(x = target.x, y = target.y, "grasp target computed");
    self.segmentation_mask = Some(mask);
    self.grasp_target = Some(target);
    true
  }

  /// GRASPING: execute the grasp.
  async fn step_grasp(&mut self) -> bool {
    let Some(target) = self.grasp_target.take() else {
      return self.fail("grasping: no grasp target".to_string());
    };
    self.segmentation_mask = None;

    match self.collab.robot.grasp(&target).await {
      Ok(()) => {
        info!("grasp executed");
        true
      }
      Err(e) => self.fail(format!("grasping: {}", e)),
    }
  }

  /// RESETTING: return to the safe pose, mark the medicine grasped.
  async fn step_reset(&mut self) -> bool {
    if let Err(e) = self.collab.robot.reset().await {
      return self.fail(format!("resetting: {}", e));
    }

    let Some(name) = self.current_medicine.take() else {
      return self.fail("resetting: no medicine selected".to_string());
    };
    match self.store.mark(&name, MedicineStatus::Grasped) {
      Ok(()) => {
        info!(medicine = %name, "medicine grasped");
        true
      }
      Err(e) => self.fail(format!("resetting: {}", e)),
    }
  }
}
