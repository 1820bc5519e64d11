//! Perlin heightmap terrain with volumetric overhangs.

use std::f64::consts::PI;

use glam::Vec3;
use noise::{NoiseFn, Perlin};

use super::ScalarField;

/// Rolling terrain: a 2D Perlin heightmap carved by 3D Perlin noise, with a
/// thin ground band that keeps the surface closed near `y = 0`.
///
/// Both noise lookups are offset by π so lattice points never land on integer
/// noise coordinates, where Perlin noise is exactly zero.
///
/// ```text
/// height01 = perlin2(xz) in [0, 1]
/// density  = -(min(height01 * height_scale - y, -perlin3(xyz))
///              + clamp01(height01 - y + 0.5))
/// ```
#[derive(Clone, Debug)]
pub struct PerlinTerrainField {
  heightmap: Perlin,
  volume: Perlin,
  /// Noise frequency (default: 0.1). Smaller = larger terrain features.
  pub frequency: f64,
  /// Peak height of the heightmap in world units (default: 8.0).
  pub height_scale: f32,
  seed: u32,
}

impl PerlinTerrainField {
  pub fn new(seed: u32) -> Self {
    Self {
      heightmap: Perlin::new(seed),
      volume: Perlin::new(seed.wrapping_add(1)),
      frequency: 0.1,
      height_scale: 8.0,
      seed,
    }
  }

  pub fn with_frequency(mut self, frequency: f64) -> Self {
    self.frequency = frequency;
    self
  }

  pub fn with_height_scale(mut self, height_scale: f32) -> Self {
    self.height_scale = height_scale;
    self
  }

  pub fn seed(&self) -> u32 {
    self.seed
  }

  /// Normalized heightmap value in `[0, 1]` at a horizontal position.
  pub fn height01(&self, x: f32, z: f32) -> f32 {
    let raw = self.heightmap.get([
      (x as f64 + PI) * self.frequency,
      (z as f64 + PI) * self.frequency,
    ]);
    ((raw * 0.5 + 0.5) as f32).clamp(0.0, 1.0)
  }

  fn volumetric(&self, position: Vec3) -> f32 {
    self.volume.get([
      (position.x as f64 + PI) * self.frequency,
      (position.y as f64 + PI) * self.frequency,
      (position.z as f64 + PI) * self.frequency,
    ]) as f32
  }
}

impl Default for PerlinTerrainField {
  fn default() -> Self {
    Self::new(1337)
  }
}

impl ScalarField for PerlinTerrainField {
  fn sample(&self, position: Vec3) -> f32 {
    let height01 = self.height01(position.x, position.z);
    let height_sample = height01 * self.height_scale - position.y;
    let volumetric = self.volumetric(position);
    let band = (height01 - position.y + 0.5).clamp(0.0, 1.0);

    -(height_sample.min(-volumetric) + band)
  }
}
