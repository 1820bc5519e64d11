//! Marching cubes isosurface extraction for one chunk.
//!
//! # Algorithm Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ Phase 1: Sample lattice                                         │
//! │   (n+1)³ field evaluations into a reusable buffer               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Phase 2: March cubes                                            │
//! │   For each of the n³ cubes:                                     │
//! │   - Build the case index from the 8 cached corner densities     │
//! │   - Skip if EDGE_TABLE[case] == 0                               │
//! │   - Emit TRI_TABLE[case] triangles, one fresh vertex per corner │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Phase 3: Attributes (inline)                                    │
//! │   Flat face normals, zeroed UVs, bounds                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Positions are emitted in the chunk's local frame: lattice corner `(x, y, z)`
//! sits at `(x, y, z) * voxel_size` relative to `origin`. Triangles wind
//! counter-clockwise when viewed from empty space, so face normals point away
//! from solid.

mod lattice;
mod vertex;

use glam::Vec3;
pub use lattice::{SampleLattice, NAN_SUBSTITUTE};
use tracing::{debug, warn};
pub use vertex::{edge_parameter, edge_vertex};

use crate::edge_table::{case_triangles, corner_position, CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE};
use crate::field::ScalarField;
use crate::types::MeshOutput;

/// Reusable extractor. Holds the sample lattice and the output buffers so
/// repeated extractions do not reallocate.
#[derive(Clone, Debug, Default)]
pub struct MarchingCubes {
  lattice: SampleLattice,
  output: MeshOutput,
}

impl MarchingCubes {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear all scratch and output buffers, preserving capacity.
  pub fn reset(&mut self) {
    self.lattice.clear();
    self.output.clear();
  }

  /// Result of the last extraction.
  pub fn output(&self) -> &MeshOutput {
    &self.output
  }

  /// Move the last result out, leaving an empty output behind.
  pub fn take_output(&mut self) -> MeshOutput {
    std::mem::take(&mut self.output)
  }

  /// Extract the zero isosurface of `field` over an `n³` cube grid.
  ///
  /// # Arguments
  /// * `origin` - World position of lattice corner `(0, 0, 0)`
  /// * `voxel_count` - Cubes per axis; `<= 0` yields an empty mesh
  /// * `voxel_size` - Cube edge length in world units
  /// * `interpolate` - Place vertices at the linear zero crossing instead of
  ///   edge midpoints
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "marching_cubes::extract"))]
  pub fn extract<F: ScalarField + ?Sized>(
    &mut self,
    field: &F,
    origin: Vec3,
    voxel_count: i32,
    voxel_size: f32,
    interpolate: bool,
  ) -> &MeshOutput {
    self.reset();

    if voxel_count <= 0 {
      debug!(voxel_count, "non-positive voxel count, emitting empty mesh");
      return &self.output;
    }

    let n = voxel_count as usize;
    self.lattice.fill(field, origin, n, voxel_size);

    let nan_samples = self.lattice.nan_count();
    if nan_samples > 0 {
      warn!(
        nan_samples,
        origin = ?origin,
        "field returned NaN samples, treated as outside"
      );
    }
    self.output.nan_samples = nan_samples;

    if self.lattice.is_homogeneous() {
      return &self.output;
    }

    for z in 0..n {
      for y in 0..n {
        for x in 0..n {
          self.march_cube(x, y, z, voxel_size, interpolate);
        }
      }
    }

    &self.output
  }

  #[inline]
  fn march_cube(&mut self, x: usize, y: usize, z: usize, voxel_size: f32, interpolate: bool) {
    let mut densities = [0.0f32; 8];
    let mut case = 0usize;

    for (corner, offset) in CORNER_OFFSETS.iter().enumerate() {
      let density = self.lattice.get(x + offset[0], y + offset[1], z + offset[2]);
      densities[corner] = density;
      if density < 0.0 {
        case |= 1 << corner;
      }
    }

    if EDGE_TABLE[case] == 0 {
      return;
    }

    let cube_min = Vec3::new(x as f32, y as f32, z as f32);
    let crossing = |edge: usize| -> Vec3 {
      let [ca, cb] = EDGE_CORNERS[edge];
      let a = cube_min + Vec3::from(corner_position(ca));
      let b = cube_min + Vec3::from(corner_position(cb));
      edge_vertex(
        a,
        b,
        densities[ca as usize],
        densities[cb as usize],
        interpolate,
      ) * voxel_size
    };

    for [e0, e1, e2] in case_triangles(case) {
      // Table order faces the solid side.
      self.push_triangle(crossing(e0), crossing(e2), crossing(e1));
    }
  }

  #[inline]
  fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
    let normal = (b - a).cross(c - a).try_normalize().unwrap_or(Vec3::Y).to_array();
    let base = self.output.positions.len() as u32;

    for p in [a, b, c] {
      let p = p.to_array();
      self.output.positions.push(p);
      self.output.normals.push(normal);
      self.output.uvs.push([0.0, 0.0]);
      self.output.bounds.encapsulate(p);
    }

    self.output.indices.extend_from_slice(&[base, base + 1, base + 2]);
  }
}

/// One-shot extraction with a fresh extractor.
pub fn extract<F: ScalarField + ?Sized>(
  field: &F,
  origin: Vec3,
  voxel_count: i32,
  voxel_size: f32,
  interpolate: bool,
) -> MeshOutput {
  let mut extractor = MarchingCubes::new();
  extractor.extract(field, origin, voxel_count, voxel_size, interpolate);
  extractor.take_output()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
