//! Simple analytic fields for testing and debugging.
//!
//! Deterministic mathematical shapes whose surfaces are easy to verify, used
//! to test chunk tiling without noise generation complexity.

use glam::Vec3;

use super::ScalarField;

/// Sphere of a given radius. Negative inside.
#[derive(Clone, Copy, Debug)]
pub struct SphereField {
  pub center: Vec3,
  pub radius: f32,
}

impl SphereField {
  pub fn new(center: Vec3, radius: f32) -> Self {
    Self { center, radius }
  }
}

impl Default for SphereField {
  fn default() -> Self {
    Self::new(Vec3::ZERO, 8.0)
  }
}

impl ScalarField for SphereField {
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    position.distance(self.center) - self.radius
  }
}

/// Horizontal ground plane: solid below `height`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroundPlaneField {
  pub height: f32,
}

impl GroundPlaneField {
  pub fn new(height: f32) -> Self {
    Self { height }
  }
}

impl ScalarField for GroundPlaneField {
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    position.y - self.height
  }
}
