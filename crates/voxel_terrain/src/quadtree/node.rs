//! QuadTreeNode - one square column of terrain at a power-of-two scale.

use glam::{IVec3, Vec3};

use crate::types::{ChunkKey, VoxelCoord};

/// Quadrant offsets in units of the child footprint, as `[x, z]`.
///
/// ```text
///   +Z
///    │ 2 │ 3 │
///    ├───┼───┤
///    │ 0 │ 1 │
///    └───────── +X
/// ```
pub const QUADRANT_OFFSETS: [[i32; 2]; 4] = [[0, 0], [1, 0], [0, 1], [1, 1]];

/// Index of a node slot in a [`NodeArena`](super::NodeArena).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeHandle(pub(crate) u32);

impl NodeHandle {
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// A quadtree node. The tree only subdivides on X and Z; every node spans the
/// full chunk height.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadTreeNode {
  /// Minimum corner in base voxel units.
  pub min: VoxelCoord,
  /// Power-of-two scale (1 = finest).
  pub lod_scale: i32,
  /// All four children or none.
  pub children: Option<[NodeHandle; 4]>,
  /// Chunk this node has requested, if any.
  pub chunk: Option<ChunkKey>,
  /// Mesh must be rebuilt once resident.
  pub dirty: bool,
  /// Quadrant within the parent (0 for the root).
  pub child_index: u8,
  pub parent: Option<NodeHandle>,
}

impl QuadTreeNode {
  pub fn root(min: VoxelCoord, lod_scale: i32) -> Self {
    Self {
      min,
      lod_scale,
      children: None,
      chunk: None,
      dirty: false,
      child_index: 0,
      parent: None,
    }
  }

  pub fn child(min: VoxelCoord, lod_scale: i32, child_index: u8, parent: NodeHandle) -> Self {
    Self {
      min,
      lod_scale,
      children: None,
      chunk: None,
      dirty: false,
      child_index,
      parent: Some(parent),
    }
  }

  /// Key of the chunk this node displays.
  #[inline]
  pub fn key(&self) -> ChunkKey {
    ChunkKey::new(self.min, self.lod_scale)
  }

  #[inline]
  pub fn has_children(&self) -> bool {
    self.children.is_some()
  }

  /// Minimum corners of the four children, in quadrant order.
  pub fn child_mins(&self, chunk_size: i32) -> [VoxelCoord; 4] {
    let step = (self.lod_scale / 2) * chunk_size;
    QUADRANT_OFFSETS.map(|[x, z]| self.min + IVec3::new(x * step, 0, z * step))
  }

  /// Horizontal footprint in base voxel units.
  #[inline]
  pub fn extent(&self, chunk_size: i32) -> i32 {
    chunk_size * self.lod_scale
  }

  /// Whether the XZ footprint contains a world point. Edges are inclusive.
  pub fn contains_xz(&self, point: Vec3, chunk_size: i32, voxel_size: f32) -> bool {
    let min = self.min.as_vec3() * voxel_size;
    let size = self.extent(chunk_size) as f32 * voxel_size;
    point.x >= min.x && point.x <= min.x + size && point.z >= min.z && point.z <= min.z + size
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_child_mins_cover_parent() {
    let node = QuadTreeNode::root(IVec3::new(-64, 0, -64), 8);
    let mins = node.child_mins(16);

    assert_eq!(mins[0], IVec3::new(-64, 0, -64));
    assert_eq!(mins[1], IVec3::new(0, 0, -64));
    assert_eq!(mins[2], IVec3::new(-64, 0, 0));
    assert_eq!(mins[3], IVec3::new(0, 0, 0));
  }

  #[test]
  fn test_key_uses_min_and_scale() {
    let node = QuadTreeNode::child(IVec3::new(16, 0, 32), 2, 3, NodeHandle(0));
    assert_eq!(node.key(), ChunkKey::new(IVec3::new(16, 0, 32), 2));
    assert_eq!(node.parent, Some(NodeHandle(0)));
    assert!(!node.has_children());
  }

  #[test]
  fn test_contains_xz_inclusive() {
    let node = QuadTreeNode::root(IVec3::new(0, 0, 0), 2);
    assert!(node.contains_xz(Vec3::new(0.0, 100.0, 0.0), 16, 1.0));
    assert!(node.contains_xz(Vec3::new(32.0, 0.0, 32.0), 16, 1.0));
    assert!(!node.contains_xz(Vec3::new(32.5, 0.0, 1.0), 16, 1.0));
    assert!(node.contains_xz(Vec3::new(15.0, 0.0, 15.0), 16, 0.5));
    assert!(!node.contains_xz(Vec3::new(17.0, 0.0, 15.0), 16, 0.5));
  }
}
