//! Quadtree loader benchmarks.
//!
//! All loaders run with the inline scheduler so the measured time covers
//! traversal, extraction and store bookkeeping on one thread.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use voxel_terrain::{
  GroundPlaneField, LoaderConfig, NullSink, PerlinTerrainField, QuadTreeLoader, SchedulerConfig,
};

fn config(max_lod: u32) -> LoaderConfig {
  LoaderConfig::default()
    .with_max_lod(max_lod)
    .with_scheduler(SchedulerConfig::inline())
}

/// Drive a fresh loader at the origin until nothing changes.
fn settle<F>(loader: &mut QuadTreeLoader<F, NullSink>, camera: Vec3)
where
  F: voxel_terrain::ScalarField + Send + Sync + 'static,
{
  for _ in 0..64 {
    let stats = *loader.update(camera);
    if stats.is_quiescent() && loader.scheduler().is_idle() {
      break;
    }
  }
}

/// Cold start: refine from a bare root to a stable tree.
fn bench_cold_start(c: &mut Criterion) {
  let mut group = c.benchmark_group("loader/cold_start");
  group.sample_size(10);

  for max_lod in [3u32, 4, 5] {
    group.bench_with_input(BenchmarkId::from_parameter(max_lod), &max_lod, |b, &max_lod| {
      b.iter(|| {
        let mut loader = QuadTreeLoader::new(config(max_lod), GroundPlaneField::new(4.0), NullSink)
          .expect("valid config");
        settle(&mut loader, Vec3::ZERO);
        black_box(loader.node_count())
      })
    });
  }

  group.finish();
}

/// Steady state: an already refined tree with a stationary camera.
fn bench_steady_update(c: &mut Criterion) {
  let mut loader = QuadTreeLoader::new(config(5), PerlinTerrainField::new(1337), NullSink)
    .expect("valid config");
  settle(&mut loader, Vec3::ZERO);

  c.bench_function("loader/steady_update", |b| {
    b.iter(|| black_box(*loader.update(black_box(Vec3::ZERO))))
  });
}

/// Flythrough: camera moves along +X, forcing splits and merges every few frames.
fn bench_camera_path(c: &mut Criterion) {
  let mut group = c.benchmark_group("loader/camera_path");
  group.sample_size(10);

  group.bench_function("straight_line_256", |b| {
    b.iter(|| {
      let mut loader = QuadTreeLoader::new(config(4), PerlinTerrainField::new(7), NullSink)
        .expect("valid config");
      for frame in 0..256 {
        let camera = Vec3::new(frame as f32 * 2.0, 8.0, 0.0);
        black_box(*loader.update(camera));
      }
      loader.shutdown()
    })
  });

  group.finish();
}

criterion_group!(benches, bench_cold_start, bench_steady_update, bench_camera_path);
criterion_main!(benches);
