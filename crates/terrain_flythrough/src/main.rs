//! terrain_flythrough - Headless streaming terrain driver
//!
//! Owns a Perlin terrain field and a quadtree loader, flies a scripted camera
//! over the terrain and calls `update(camera position)` once per frame. No
//! window: chunk uploads go to a logging sink and loader stats go to the log.
//!
//! ```text
//! terrain_flythrough --config flythrough.toml --frames 1200
//! RUST_LOG=voxel_terrain=debug terrain_flythrough --inline
//! ```

mod config;
mod fly_camera;
mod sink;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voxel_terrain::{LoaderStats, PerlinTerrainField, QuadTreeLoader, SchedulerConfig};
use web_time::Instant;

use config::FlythroughConfig;
use fly_camera::{CameraScript, FlyCamera};
use sink::LoggingSink;

/// Headless flythrough over streamed marching-cubes terrain.
#[derive(Parser, Debug)]
#[command(name = "terrain_flythrough")]
#[command(about = "Streams quadtree LOD terrain around a scripted camera")]
struct Args {
	/// Path to configuration TOML file (defaults apply when omitted).
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Override the number of frames to simulate.
	#[arg(short, long)]
	frames: Option<u32>,

	/// Override the terrain seed.
	#[arg(short, long)]
	seed: Option<u32>,

	/// Override camera movement speed (units per second).
	#[arg(long)]
	speed: Option<f32>,

	/// Override the quadtree depth.
	#[arg(long)]
	max_lod: Option<u32>,

	/// Extract chunks on the calling thread instead of the rayon pool.
	#[arg(long)]
	inline: bool,
}

/// Stats summed over every frame of a run.
#[derive(Debug, Default)]
struct RunTotals {
	frames: u32,
	splits: usize,
	collapses: usize,
	requested: usize,
	deferred: usize,
	installed: usize,
	orphaned: usize,
	removed: usize,
	peak_nodes: usize,
	peak_resident: usize,
}

impl RunTotals {
	fn add(&mut self, stats: &LoaderStats) {
		self.frames += 1;
		self.splits += stats.splits;
		self.collapses += stats.collapses;
		self.requested += stats.requested;
		self.deferred += stats.deferred;
		self.installed += stats.installed;
		self.orphaned += stats.orphaned;
		self.removed += stats.removed;
		self.peak_nodes = self.peak_nodes.max(stats.node_count);
		self.peak_resident = self.peak_resident.max(stats.resident_chunks);
	}
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Args::parse();
	let config = load_config(&args)?;

	let field = PerlinTerrainField::new(config.terrain.seed)
		.with_frequency(config.terrain.frequency)
		.with_height_scale(config.terrain.height_scale);

	let mut loader = QuadTreeLoader::new(config.loader.clone(), field, LoggingSink::new())
		.context("Failed to create quadtree loader")?;

	let mut camera = FlyCamera::new(
		Vec3::from_array(config.camera.position),
		config.camera.yaw,
		config.camera.pitch,
		config.camera.move_speed,
	);
	let script = CameraScript::new(config.camera.path.clone(), config.camera.looped);

	info!(
		seed = config.terrain.seed,
		max_lod = config.loader.max_lod,
		chunk_size = config.loader.chunk_size,
		frames = config.run.frames,
		script_secs = script.duration(),
		"starting flythrough"
	);

	let dt = config.run.frame_dt;
	let mut totals = RunTotals::default();
	let started = Instant::now();

	for frame in 0..config.run.frames {
		let input = script.input_at(frame as f32 * dt);
		camera.advance(&input, dt);

		let stats = *loader.update(camera.position);
		totals.add(&stats);

		if config.run.log_every > 0 && frame % config.run.log_every == 0 {
			let scheduler = loader.scheduler();
			info!(
				frame,
				x = camera.position.x,
				y = camera.position.y,
				z = camera.position.z,
				nodes = stats.node_count,
				resident = stats.resident_chunks,
				visible = stats.visible_chunks,
				queued = scheduler.queued_count(),
				in_flight = scheduler.in_flight_count(),
				avg_extract_us = scheduler.metrics().avg_extraction_us(),
				"frame"
			);
		}
	}

	let frame_time = started.elapsed();
	settle(&mut loader, camera.position, Duration::from_millis(config.run.settle_timeout_ms));

	let sink = loader.store().sink();
	let metrics = loader.scheduler().metrics();
	info!(
		frames = totals.frames,
		elapsed_ms = frame_time.as_millis() as u64,
		splits = totals.splits,
		collapses = totals.collapses,
		requested = totals.requested,
		deferred = totals.deferred,
		installed = totals.installed,
		orphaned = totals.orphaned,
		removed = totals.removed,
		peak_nodes = totals.peak_nodes,
		peak_resident = totals.peak_resident,
		peak_live = sink.peak_live,
		uploaded_triangles = sink.uploaded_triangles,
		visible_triangles = loader.store().visible_triangles(),
		cancelled = metrics.cancelled,
		avg_extract_us = metrics.avg_extraction_us(),
		"run complete"
	);

	let removed = loader.shutdown();
	let live = loader.store().sink().recording().live_count();
	info!(removed, live, "shutdown");
	if live != 0 {
		anyhow::bail!("{live} renderables still live after shutdown");
	}

	Ok(())
}

/// Merge the TOML file (if any) with CLI overrides.
fn load_config(args: &Args) -> Result<FlythroughConfig> {
	let mut config = match &args.config {
		Some(path) => {
			info!("Loading config from: {}", path.display());
			FlythroughConfig::load(path)?
		}
		None => FlythroughConfig::default(),
	};

	if let Some(frames) = args.frames {
		config.run.frames = frames;
	}
	if let Some(seed) = args.seed {
		config.terrain.seed = seed;
	}
	if let Some(speed) = args.speed {
		config.camera.move_speed = speed;
	}
	if let Some(max_lod) = args.max_lod {
		config.loader.max_lod = max_lod;
	}
	if args.inline {
		config.loader.scheduler = SchedulerConfig::inline();
	}

	config.validate().context("Invalid configuration after CLI overrides")?;
	Ok(config)
}

/// Keep updating at a fixed camera until in-flight jobs land or the timeout hits.
fn settle(loader: &mut QuadTreeLoader<PerlinTerrainField, LoggingSink>, camera: Vec3, timeout: Duration) {
	let deadline = Instant::now() + timeout;

	loop {
		let stats = *loader.update(camera);
		if stats.is_quiescent() && loader.scheduler().is_idle() {
			return;
		}
		if Instant::now() >= deadline {
			warn!(
				queued = loader.scheduler().queued_count(),
				in_flight = loader.scheduler().in_flight_count(),
				"settle timed out"
			);
			return;
		}
		std::thread::sleep(Duration::from_millis(1));
	}
}
