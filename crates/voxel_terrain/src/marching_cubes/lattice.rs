//! Cached corner samples for one chunk.
//!
//! Adjacent cubes share corners, so the field is sampled once per lattice point
//! into a flat buffer before any cube is marched.

use glam::Vec3;

use crate::field::ScalarField;

/// Density substituted for NaN samples. Positive, so the corner is outside.
pub const NAN_SUBSTITUTE: f32 = 1.0;

/// `(n + 1)³` densities laid out X-fastest.
#[derive(Clone, Debug, Default)]
pub struct SampleLattice {
  samples: Vec<f32>,
  dim: usize,
  nan_count: u32,
}

impl SampleLattice {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sample every corner of an `n³` cube grid starting at `origin`.
  ///
  /// Reuses the existing allocation; the buffer only grows.
  pub fn fill<F: ScalarField + ?Sized>(
    &mut self,
    field: &F,
    origin: Vec3,
    voxel_count: usize,
    voxel_size: f32,
  ) {
    let dim = voxel_count + 1;
    self.dim = dim;
    self.nan_count = 0;
    self.samples.clear();
    self.samples.reserve(dim * dim * dim);

    for z in 0..dim {
      for y in 0..dim {
        for x in 0..dim {
          let position = origin + Vec3::new(x as f32, y as f32, z as f32) * voxel_size;
          let mut density = field.sample(position);
          if density.is_nan() {
            self.nan_count += 1;
            density = NAN_SUBSTITUTE;
          }
          self.samples.push(density);
        }
      }
    }
  }

  /// Clear samples, preserving capacity.
  pub fn clear(&mut self) {
    self.samples.clear();
    self.dim = 0;
    self.nan_count = 0;
  }

  #[inline(always)]
  pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
    x + y * self.dim + z * self.dim * self.dim
  }

  #[inline(always)]
  pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
    self.samples[self.index(x, y, z)]
  }

  /// Corners per axis (`voxel_count + 1`).
  pub fn dim(&self) -> usize {
    self.dim
  }

  pub fn len(&self) -> usize {
    self.samples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }

  /// NaN samples replaced during the last fill.
  pub fn nan_count(&self) -> u32 {
    self.nan_count
  }

  /// True when every sample is on the same side of the surface.
  pub fn is_homogeneous(&self) -> bool {
    match self.samples.first() {
      Some(&first) => {
        let inside = first < 0.0;
        self.samples.iter().all(|&d| (d < 0.0) == inside)
      }
      None => true,
    }
  }
}
