//! LoaderConfig - world layout, LOD policy and scheduler limits.

use glam::{IVec3, Vec3};
use serde::Deserialize;
use thiserror::Error;

use crate::scheduler::SchedulerConfig;
use crate::types::VoxelCoord;

/// Deepest tree supported. Keeps `chunk_size << max_lod` inside `i32`.
pub const MAX_LOD_LIMIT: u32 = 24;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  #[error("max_lod {0} must be at most {MAX_LOD_LIMIT} and keep the root extent inside i32")]
  InvalidMaxLod(u32),
  #[error("chunk_size {0} must be positive")]
  InvalidChunkSize(i32),
  #[error("voxel_size {0} must be finite and positive")]
  InvalidVoxelSize(f32),
  #[error("merge_hysteresis {0} must be finite and non-negative")]
  InvalidHysteresis(f32),
  #[error("scheduler limits must be at least 1 (max_in_flight {max_in_flight}, max_queued {max_queued})")]
  InvalidSchedulerLimits {
    max_in_flight: usize,
    max_queued: usize,
  },
}

/// Configuration for the quadtree loader.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
  /// Depth of the tree. The root has `lod_scale = 2^max_lod`.
  pub max_lod: u32,

  /// Cubes per chunk axis.
  pub chunk_size: i32,

  /// Base voxel size in world units.
  pub voxel_size: f32,

  /// Interpolate vertex positions along edges.
  pub interpolate: bool,

  /// Extra distance factor before a subdivided node merges back.
  /// 0.0 keeps the single split/merge threshold.
  pub merge_hysteresis: f32,

  pub scheduler: SchedulerConfig,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self {
      max_lod: 9,
      chunk_size: 16,
      voxel_size: 1.0,
      interpolate: true,
      merge_hysteresis: 0.0,
      scheduler: SchedulerConfig::default(),
    }
  }
}

impl LoaderConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_lod(mut self, max_lod: u32) -> Self {
    self.max_lod = max_lod;
    self
  }

  pub fn with_chunk_size(mut self, chunk_size: i32) -> Self {
    self.chunk_size = chunk_size;
    self
  }

  pub fn with_voxel_size(mut self, voxel_size: f32) -> Self {
    self.voxel_size = voxel_size;
    self
  }

  pub fn with_interpolate(mut self, interpolate: bool) -> Self {
    self.interpolate = interpolate;
    self
  }

  pub fn with_merge_hysteresis(mut self, merge_hysteresis: f32) -> Self {
    self.merge_hysteresis = merge_hysteresis;
    self
  }

  pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
    self.scheduler = scheduler;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.chunk_size <= 0 {
      return Err(ConfigError::InvalidChunkSize(self.chunk_size));
    }
    if self.max_lod > MAX_LOD_LIMIT || self.chunk_size.checked_mul(1 << self.max_lod).is_none() {
      return Err(ConfigError::InvalidMaxLod(self.max_lod));
    }
    if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
      return Err(ConfigError::InvalidVoxelSize(self.voxel_size));
    }
    if !(self.merge_hysteresis.is_finite() && self.merge_hysteresis >= 0.0) {
      return Err(ConfigError::InvalidHysteresis(self.merge_hysteresis));
    }
    if !self.scheduler.is_valid() {
      return Err(ConfigError::InvalidSchedulerLimits {
        max_in_flight: self.scheduler.max_in_flight,
        max_queued: self.scheduler.max_queued,
      });
    }
    Ok(())
  }

  /// Scale of the root node.
  #[inline]
  pub fn root_lod_scale(&self) -> i32 {
    1 << self.max_lod
  }

  /// Minimum corner of the root, centred on the origin in X and Z.
  pub fn root_min(&self) -> VoxelCoord {
    let half = self.root_lod_scale() / 2;
    IVec3::new(-half * self.chunk_size, 0, -half * self.chunk_size)
  }

  /// Half the world's horizontal extent in world units.
  pub fn half_extent(&self) -> f32 {
    (self.root_lod_scale() / 2) as f32 * self.chunk_size as f32 * self.voxel_size
  }

  /// Horizontal size of a node in world units.
  #[inline]
  pub fn world_size(&self, lod_scale: i32) -> f32 {
    self.chunk_size as f32 * lod_scale as f32 * self.voxel_size
  }

  /// Point the LOD distance is measured from: centre of the footprint at the
  /// node's base height.
  pub fn node_center(&self, min: VoxelCoord, lod_scale: i32) -> Vec3 {
    let size = self.world_size(lod_scale);
    min.as_vec3() * self.voxel_size + Vec3::new(size * 0.5, 0.0, size * 0.5)
  }

  /// Leaf predicate: finest nodes are always leaves; others are leaves once
  /// the camera is more than twice their size away. Subdivided nodes need
  /// the extra hysteresis margin before they merge.
  pub fn is_leaf(&self, min: VoxelCoord, lod_scale: i32, has_children: bool, camera: Vec3) -> bool {
    if lod_scale <= 1 {
      return true;
    }

    let size = self.world_size(lod_scale);
    let mut threshold = size * 2.0;
    if has_children {
      threshold *= 1.0 + self.merge_hysteresis;
    }

    self.node_center(min, lod_scale).distance(camera) > threshold
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
