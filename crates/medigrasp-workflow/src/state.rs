/// States of the grasp workflow.
///
/// `Finished` and `Error` are terminal. The multi-prescription loop is not
/// internal: a run stops at `Finished` and the owner submits a new task to
/// start the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraspState {
  /// Present the prescription and capture its image.
  PrescriptionDisplay,
  /// Recognize the medicine list from the captured image.
  PrescriptionRecognition,
  /// Pick the next pending medicine, or finish when none is left.
  MedicineSelection,
  /// Locate the selected medicine in the workspace image.
  PointSelection,
  /// Segment the object at the selected point and derive the grasp target.
  Segmentation,
  /// Execute the grasp.
  Grasping,
  /// Return the arm to its safe pose and mark the medicine grasped.
  Resetting,
  /// All medicines processed.
  Finished,
  /// A step failed; the accumulated error text surfaces to the task record.
  Error,
}

impl GraspState {
  /// Whether this state ends a workflow run.
  pub fn is_terminal(&self) -> bool {
    matches!(self, GraspState::Finished | GraspState::Error)
  }
}
