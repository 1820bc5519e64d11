//! Messages exchanged with the generation scheduler.

use glam::Vec3;

use crate::types::{ChunkKey, MeshOutput};

/// Why a chunk mesh is being generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkSource {
  /// First mesh for a chunk the tree needs.
  Refinement,
  /// Rebuild of a chunk that is already resident.
  Invalidation,
}

/// Everything a worker needs to build one chunk mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkRequest {
  pub key: ChunkKey,
  /// World position of lattice corner `(0, 0, 0)`.
  pub origin: Vec3,
  /// Cubes per axis.
  pub voxel_count: i32,
  /// Cube edge length in world units (`voxel_size * lod_scale`).
  pub voxel_size: f32,
  pub interpolate: bool,
  pub source: WorkSource,
}

impl ChunkRequest {
  /// Build the request for a chunk key under the given world layout.
  pub fn for_key(
    key: ChunkKey,
    chunk_size: i32,
    voxel_size: f32,
    interpolate: bool,
    source: WorkSource,
  ) -> Self {
    Self {
      key,
      origin: key.world_origin(voxel_size),
      voxel_count: chunk_size,
      voxel_size: key.cell_size(voxel_size),
      interpolate,
      source,
    }
  }
}

/// Finished mesh handed back to the coordinating thread.
#[derive(Debug)]
pub struct ChunkCompletion {
  pub key: ChunkKey,
  pub source: WorkSource,
  pub mesh: MeshOutput,
  /// Raw extraction time in microseconds
  pub elapsed_us: u64,
}

/// Result of [`ChunkGenerationScheduler::request`](super::ChunkGenerationScheduler::request).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestStatus {
  /// A new job was queued.
  Queued,
  /// A job for this key is already queued or running.
  AlreadyInFlight,
  /// The queue is full; retry later.
  Deferred,
}

impl RequestStatus {
  /// True unless the request was deferred.
  pub fn is_accepted(self) -> bool {
    !matches!(self, RequestStatus::Deferred)
  }
}
