//! Core data types shared by the extractor, the chunk store and the loader.

use glam::{IVec3, Vec3};

/// Integer lattice coordinate in base voxel units.
///
/// Chunk identity is derived from these, never from floats, so two requests for
/// the same region always produce the same key.
pub type VoxelCoord = IVec3;

/// Identity of one chunk mesh: its minimum corner and LOD scale.
///
/// `lod_scale` is a power of two; a chunk with scale `s` covers
/// `chunk_size * s` base voxels per horizontal axis.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ChunkKey {
  /// Minimum corner in base voxel units.
  pub origin: VoxelCoord,
  /// Power-of-two scale factor (1 = finest).
  pub lod_scale: i32,
}

impl ChunkKey {
  #[inline]
  pub const fn new(origin: VoxelCoord, lod_scale: i32) -> Self {
    Self { origin, lod_scale }
  }

  /// World-space position of the minimum corner.
  #[inline]
  pub fn world_origin(&self, voxel_size: f32) -> Vec3 {
    self.origin.as_vec3() * voxel_size
  }

  /// Edge length of one cell of this chunk in world units.
  #[inline]
  pub fn cell_size(&self, voxel_size: f32) -> f32 {
    voxel_size * self.lod_scale as f32
  }

  /// World-space horizontal extent of the chunk.
  #[inline]
  pub fn world_size(&self, chunk_size: i32, voxel_size: f32) -> f32 {
    chunk_size as f32 * self.cell_size(voxel_size)
  }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  /// Create AABB from min/max corners.
  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }

  /// Check if a point lies inside (inclusive).
  pub fn contains(&self, point: [f32; 3]) -> bool {
    (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Triangle mesh produced for one chunk.
///
/// Positions are relative to the chunk's world origin. Every attribute buffer
/// is parallel to `positions`.
#[derive(Clone, Debug, Default)]
pub struct MeshOutput {
  /// Vertex positions in the chunk's local frame.
  pub positions: Vec<[f32; 3]>,

  /// Per-vertex normals (unit vectors, flat per face).
  pub normals: Vec<[f32; 3]>,

  /// Texture coordinates. Always zero; kept so consumers get a complete
  /// vertex layout.
  pub uvs: Vec<[f32; 2]>,

  /// Triangle indices (3 indices per triangle).
  pub indices: Vec<u32>,

  /// Bounding box encompassing all vertices.
  pub bounds: MinMaxAABB,

  /// Field samples that came back as NaN and were treated as outside.
  pub nan_samples: u32,
}

impl MeshOutput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    self.positions.clear();
    self.normals.clear();
    self.uvs.clear();
    self.indices.clear();
    self.bounds = MinMaxAABB::empty();
    self.nan_samples = 0;
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
