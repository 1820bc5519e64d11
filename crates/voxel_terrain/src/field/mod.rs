//! Scalar density fields sampled by the extractor.
//!
//! Convention: `density < 0` is solid, `density >= 0` is empty space. The
//! surface is the zero level set.
//!
//! Fields must be pure and deterministic. The scheduler samples the same field
//! from several worker threads at once, so anything handed to the loader must
//! also be `Send + Sync`.

use std::sync::Arc;

use glam::Vec3;

mod samplers;
mod terrain;

pub use samplers::{GroundPlaneField, SphereField};
pub use terrain::PerlinTerrainField;

/// A density function over world space.
pub trait ScalarField {
  /// Density at a world-space position.
  fn sample(&self, position: Vec3) -> f32;
}

impl<T: ScalarField + ?Sized> ScalarField for &T {
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    (**self).sample(position)
  }
}

impl<T: ScalarField + ?Sized> ScalarField for Box<T> {
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    (**self).sample(position)
  }
}

impl<T: ScalarField + ?Sized> ScalarField for Arc<T> {
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    (**self).sample(position)
  }
}

/// Adapts a closure into a [`ScalarField`].
///
/// ```ignore
/// let field = FieldFn(|p: Vec3| p.y - 4.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FieldFn<F>(pub F);

impl<F: Fn(Vec3) -> f32> ScalarField for FieldFn<F> {
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    (self.0)(position)
  }
}

#[cfg(test)]
#[path = "field_test.rs"]
mod field_test;
