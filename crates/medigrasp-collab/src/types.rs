use serde::{Deserialize, Serialize};

/// A captured color frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
  pub width: u32,
  pub height: u32,
  pub data: Vec<u8>,
}

/// A pixel coordinate in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
  pub x: u32,
  pub y: u32,
}

impl Point {
  pub fn new(x: u32, y: u32) -> Self {
    Self { x, y }
  }
}

/// A binary segmentation mask over a frame.
///
/// `data` is row-major, one byte per pixel, nonzero meaning "object".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
  pub width: u32,
  pub height: u32,
  pub data: Vec<u8>,
}

impl Mask {
  /// Centroid of the nonzero pixels, or `None` for an empty mask.
  pub fn centroid(&self) -> Option<Point> {
    let mut count: u64 = 0;
    let mut sum_x: u64 = 0;
    let mut sum_y: u64 = 0;
    for (i, v) in self.data.iter().enumerate() {
      if *v != 0 {
        count += 1;
        sum_x += (i as u64) % (self.width as u64);
        sum_y += (i as u64) / (self.width as u64);
      }
    }
    if count == 0 {
      return None;
    }
    Some(Point::new(
      (sum_x / count) as u32,
      (sum_y / count) as u32,
    ))
  }
}

/// The grasp target handed to the robot arm.
///
/// Pose computation from depth and calibration lives behind the robot
/// collaborator; the core only carries the mask-derived target through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraspTarget {
  pub x: f64,
  pub y: f64,
  pub z: f64,
}

impl GraspTarget {
  /// Derive a target from a mask centroid.
  pub fn from_mask(mask: &Mask) -> Option<Self> {
    let center = mask.centroid()?;
    Some(Self {
      x: center.x as f64,
      y: center.y as f64,
      z: 0.0,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn centroid_of_filled_rect() {
    // 4x4 mask with a 2x2 block at (1,1)..(2,2).
    let mut data = vec![0u8; 16];
    for y in 1..3 {
      for x in 1..3 {
        data[y * 4 + x] = 1;
      }
    }
    let mask = Mask {
      width: 4,
      height: 4,
      data,
    };
    assert_eq!(mask.centroid(), Some(Point::new(1, 1)));
  }

  #[test]
  fn empty_mask_has_no_centroid() {
    let mask = Mask {
      width: 4,
      height: 4,
      data: vec![0u8; 16],
    };
    assert_eq!(mask.centroid(), None);
    assert!(GraspTarget::from_mask(&mask).is_none());
  }
}
