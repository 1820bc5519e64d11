//! Configuration parsing for the headless flythrough.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use voxel_terrain::LoaderConfig;

use crate::fly_camera::CameraSegment;

/// Root configuration for a flythrough run.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlythroughConfig {
	/// Quadtree and scheduler settings.
	pub loader: LoaderConfig,
	/// Reference terrain parameters.
	pub terrain: TerrainConfig,
	/// Starting pose and scripted path.
	pub camera: CameraConfig,
	/// Frame loop settings.
	pub run: RunConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
	pub seed: u32,
	pub frequency: f64,
	pub height_scale: f32,
}

impl Default for TerrainConfig {
	fn default() -> Self {
		Self {
			seed: 1337,
			frequency: 0.1,
			height_scale: 8.0,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
	/// Start position [x, y, z].
	pub position: [f32; 3],
	/// Start yaw in degrees, 0 looks down +Z.
	pub yaw: f32,
	/// Start pitch in degrees, positive looks up.
	pub pitch: f32,
	/// Movement speed in units per second.
	pub move_speed: f32,
	/// Restart the path when it runs out.
	pub looped: bool,
	/// Scripted input segments, played in order.
	pub path: Vec<CameraSegment>,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			position: [0.0, 12.0, 0.0],
			yaw: 0.0,
			pitch: 0.0,
			move_speed: 10.0,
			looped: true,
			path: Vec::new(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
	/// Frames to simulate.
	pub frames: u32,
	/// Fixed timestep in seconds.
	pub frame_dt: f32,
	/// Log loader stats every N frames (0 disables).
	pub log_every: u32,
	/// How long to wait for in-flight jobs after the last frame.
	pub settle_timeout_ms: u64,
}

impl Default for RunConfig {
	fn default() -> Self {
		Self {
			frames: 600,
			frame_dt: 1.0 / 60.0,
			log_every: 60,
			settle_timeout_ms: 5_000,
		}
	}
}

impl FlythroughConfig {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate configuration from TOML text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: FlythroughConfig =
			toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		self.loader
			.validate()
			.with_context(|| "Invalid [loader] section")?;

		if !(self.run.frame_dt > 0.0) {
			anyhow::bail!("frame_dt must be positive, got {}", self.run.frame_dt);
		}
		if !(self.camera.move_speed >= 0.0) {
			anyhow::bail!("move_speed must be non-negative, got {}", self.camera.move_speed);
		}
		if let Some(segment) = self.camera.path.iter().find(|s| !(s.duration > 0.0)) {
			anyhow::bail!("camera path segment durations must be positive, got {}", segment.duration);
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_config_uses_defaults() {
		let config = FlythroughConfig::parse("").unwrap();
		assert_eq!(config.loader.max_lod, 9);
		assert_eq!(config.terrain.seed, 1337);
		assert_eq!(config.camera.move_speed, 10.0);
		assert_eq!(config.run.frames, 600);
		assert!(config.camera.path.is_empty());
	}

	#[test]
	fn test_parse_full_config() {
		let text = r#"
			[loader]
			max_lod = 4
			chunk_size = 8

			[loader.scheduler]
			mode = "inline"
			max_in_flight = 2

			[terrain]
			seed = 7

			[camera]
			position = [1.0, 20.0, -3.0]
			move_speed = 25.0

			[[camera.path]]
			duration = 2.0
			forward = 1.0

			[[camera.path]]
			duration = 1.5
			yaw_rate = 45.0

			[run]
			frames = 120
			log_every = 0
		"#;

		let config = FlythroughConfig::parse(text).unwrap();
		assert_eq!(config.loader.max_lod, 4);
		assert_eq!(config.loader.chunk_size, 8);
		assert_eq!(config.loader.scheduler.max_in_flight, 2);
		assert_eq!(config.terrain.seed, 7);
		assert_eq!(config.camera.position, [1.0, 20.0, -3.0]);
		assert_eq!(config.camera.path.len(), 2);
		assert_eq!(config.camera.path[1].yaw_rate, 45.0);
		assert_eq!(config.camera.path[1].forward, 0.0);
		assert_eq!(config.run.frames, 120);
	}

	#[test]
	fn test_invalid_loader_rejected() {
		let err = FlythroughConfig::parse("[loader]\nchunk_size = 0\n").unwrap_err();
		assert!(format!("{err:#}").contains("[loader]"));
	}

	#[test]
	fn test_invalid_run_rejected() {
		assert!(FlythroughConfig::parse("[run]\nframe_dt = 0.0\n").is_err());
		assert!(FlythroughConfig::parse("[[camera.path]]\nduration = -1.0\n").is_err());
	}
}
