use super::*;
use crate::scheduler::ExecutionMode;

#[test]
fn test_defaults_match_world_constants() {
  let config = LoaderConfig::default();
  assert_eq!(config.max_lod, 9);
  assert_eq!(config.chunk_size, 16);
  assert_eq!(config.voxel_size, 1.0);
  assert!(config.interpolate);
  assert_eq!(config.merge_hysteresis, 0.0);
  assert_eq!(config.scheduler.mode, ExecutionMode::Pooled);
  assert!(config.validate().is_ok());
}

#[test]
fn test_root_layout() {
  let config = LoaderConfig::default().with_max_lod(2);
  assert_eq!(config.root_lod_scale(), 4);
  assert_eq!(config.root_min(), IVec3::new(-32, 0, -32));
  assert_eq!(config.half_extent(), 32.0);

  let config = LoaderConfig::default();
  assert_eq!(config.root_lod_scale(), 512);
  assert_eq!(config.root_min(), IVec3::new(-4096, 0, -4096));
}

#[test]
fn test_node_center() {
  let config = LoaderConfig::default().with_voxel_size(0.5);
  let center = config.node_center(IVec3::new(-32, 0, -32), 4);
  assert_eq!(center, Vec3::new(0.0, 0.0, 0.0));
  assert_eq!(config.world_size(4), 32.0);
}

#[test]
fn test_finest_scale_is_always_leaf() {
  let config = LoaderConfig::default();
  assert!(config.is_leaf(IVec3::ZERO, 1, false, Vec3::new(8.0, 0.0, 8.0)));
}

#[test]
fn test_leaf_threshold() {
  let config = LoaderConfig::default().with_max_lod(2);
  let min = config.root_min();

  // Root: size 64, threshold 128.
  assert!(!config.is_leaf(min, 4, false, Vec3::ZERO));
  assert!(!config.is_leaf(min, 4, false, Vec3::new(128.0, 0.0, 0.0)));
  assert!(config.is_leaf(min, 4, false, Vec3::new(128.5, 0.0, 0.0)));
}

#[test]
fn test_hysteresis_only_applies_to_subdivided_nodes() {
  let config = LoaderConfig::default().with_max_lod(2).with_merge_hysteresis(0.5);
  let min = config.root_min();
  let camera = Vec3::new(150.0, 0.0, 0.0);

  assert!(config.is_leaf(min, 4, false, camera));
  assert!(!config.is_leaf(min, 4, true, camera));
  assert!(config.is_leaf(min, 4, true, Vec3::new(200.0, 0.0, 0.0)));
}

#[test]
fn test_validation_errors() {
  assert_eq!(
    LoaderConfig::default().with_chunk_size(0).validate(),
    Err(ConfigError::InvalidChunkSize(0))
  );
  assert_eq!(
    LoaderConfig::default().with_max_lod(30).validate(),
    Err(ConfigError::InvalidMaxLod(30))
  );
  assert_eq!(
    LoaderConfig::default()
      .with_max_lod(24)
      .with_chunk_size(1024)
      .validate(),
    Err(ConfigError::InvalidMaxLod(24))
  );
  assert_eq!(
    LoaderConfig::default().with_voxel_size(-1.0).validate(),
    Err(ConfigError::InvalidVoxelSize(-1.0))
  );
  assert!(matches!(
    LoaderConfig::default().with_voxel_size(f32::NAN).validate(),
    Err(ConfigError::InvalidVoxelSize(_))
  ));
  assert_eq!(
    LoaderConfig::default().with_merge_hysteresis(-0.1).validate(),
    Err(ConfigError::InvalidHysteresis(-0.1))
  );
  assert_eq!(
    LoaderConfig::default()
      .with_scheduler(SchedulerConfig::default().with_max_queued(0))
      .validate(),
    Err(ConfigError::InvalidSchedulerLimits {
      max_in_flight: SchedulerConfig::default().max_in_flight,
      max_queued: 0,
    })
  );
}

#[test]
fn test_deserialize_partial_toml() {
  let config: LoaderConfig = toml::from_str(
    r#"
      max_lod = 4
      voxel_size = 0.5

      [scheduler]
      mode = "inline"
      max_in_flight = 2
    "#,
  )
  .unwrap();

  assert_eq!(config.max_lod, 4);
  assert_eq!(config.voxel_size, 0.5);
  assert_eq!(config.chunk_size, 16);
  assert!(config.interpolate);
  assert_eq!(config.scheduler.mode, ExecutionMode::Inline);
  assert_eq!(config.scheduler.max_in_flight, 2);
  assert_eq!(config.scheduler.max_queued, 256);
}
