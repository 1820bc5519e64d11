//! Marching cubes extraction benchmarks.
//!
//! Scenarios:
//! - **sphere**: Predictable surface ratio, cheap field
//! - **terrain**: Two-noise Perlin terrain, field cost dominates
//! - **empty**: Homogeneous chunk, exercises the early-out
//!
//! Each runs at 16³ and 32³ cells, with and without edge interpolation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::Vec3;
use voxel_terrain::{GroundPlaneField, MarchingCubes, PerlinTerrainField, ScalarField, SphereField};

const SIZES: [i32; 2] = [16, 32];

fn bench_field<F: ScalarField>(c: &mut Criterion, name: &str, field: &F, origin: Vec3) {
  let mut group = c.benchmark_group(format!("extract/{name}"));

  for &size in &SIZES {
    let samples = (size as u64 + 1).pow(3);
    group.throughput(Throughput::Elements(samples));

    for interpolate in [true, false] {
      let label = if interpolate { "lerp" } else { "midpoint" };
      let mut extractor = MarchingCubes::new();

      group.bench_with_input(BenchmarkId::new(label, size), &size, |b, &size| {
        b.iter(|| {
          let mesh = extractor.extract(black_box(field), origin, size, 1.0, interpolate);
          black_box(mesh.triangle_count())
        })
      });
    }
  }

  group.finish();
}

fn bench_sphere(c: &mut Criterion) {
  let field = SphereField::new(Vec3::splat(16.0), 12.0);
  bench_field(c, "sphere", &field, Vec3::ZERO);
}

fn bench_terrain(c: &mut Criterion) {
  let field = PerlinTerrainField::new(1337);
  bench_field(c, "terrain", &field, Vec3::new(0.0, 0.0, 0.0));
}

fn bench_empty(c: &mut Criterion) {
  // Plane far below the chunk, every sample is outside.
  let field = GroundPlaneField::new(-1000.0);
  bench_field(c, "empty", &field, Vec3::ZERO);
}

/// Fresh extractor per chunk vs. a reused one, isolates allocation cost.
fn bench_reuse(c: &mut Criterion) {
  let field = SphereField::new(Vec3::splat(16.0), 12.0);
  let mut group = c.benchmark_group("extract/reuse");

  group.bench_function("fresh", |b| {
    b.iter(|| {
      let mesh = voxel_terrain::marching_cubes::extract(black_box(&field), Vec3::ZERO, 32, 1.0, true);
      black_box(mesh.vertex_count())
    })
  });

  let mut extractor = MarchingCubes::new();
  group.bench_function("reused", |b| {
    b.iter(|| {
      let mesh = extractor.extract(black_box(&field), Vec3::ZERO, 32, 1.0, true);
      black_box(mesh.vertex_count())
    })
  });

  group.finish();
}

criterion_group!(benches, bench_sphere, bench_terrain, bench_empty, bench_reuse);
criterion_main!(benches);
