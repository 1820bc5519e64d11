use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::*;
use crate::field::{FieldFn, GroundPlaneField, SphereField};

/// Wraps a field and counts evaluations.
struct CountingField<F> {
  inner: F,
  calls: AtomicUsize,
}

impl<F: ScalarField> ScalarField for CountingField<F> {
  fn sample(&self, position: Vec3) -> f32 {
    self.calls.fetch_add(1, Ordering::Relaxed);
    self.inner.sample(position)
  }
}

fn centered_sphere() -> SphereField {
  SphereField::new(Vec3::splat(8.0), 5.0)
}

#[test]
fn test_sphere_produces_geometry() {
  let mesh = extract(&centered_sphere(), Vec3::ZERO, 16, 1.0, true);

  assert!(!mesh.is_empty());
  assert!(mesh.triangle_count() > 0);
  assert_eq!(mesh.indices.len() % 3, 0);
  assert_eq!(mesh.normals.len(), mesh.positions.len());
  assert_eq!(mesh.uvs.len(), mesh.positions.len());
  assert!(mesh.uvs.iter().all(|uv| *uv == [0.0, 0.0]));
  assert!(mesh
    .indices
    .iter()
    .all(|&i| (i as usize) < mesh.positions.len()));
  assert!(mesh.triangle_count() <= 5 * 16 * 16 * 16);
}

#[test]
fn test_extraction_is_idempotent() {
  let field = centered_sphere();
  let mut extractor = MarchingCubes::new();

  let first = extractor.extract(&field, Vec3::ZERO, 16, 1.0, true).clone();
  let second = extractor.extract(&field, Vec3::ZERO, 16, 1.0, true).clone();
  let fresh = extract(&field, Vec3::ZERO, 16, 1.0, true);

  assert_eq!(first.positions, second.positions);
  assert_eq!(first.indices, second.indices);
  assert_eq!(first.positions, fresh.positions);
  assert_eq!(first.indices, fresh.indices);
}

#[test]
fn test_parallel_extraction_matches_sequential() {
  let field = crate::field::PerlinTerrainField::new(42);
  let origins: Vec<Vec3> = (0..8)
    .map(|i| Vec3::new((i % 4) as f32 * 16.0, 0.0, (i / 4) as f32 * 16.0))
    .collect();

  let sequential: Vec<MeshOutput> = origins
    .iter()
    .map(|&origin| extract(&field, origin, 16, 1.0, true))
    .collect();
  let parallel: Vec<MeshOutput> = origins
    .par_iter()
    .map(|&origin| extract(&field, origin, 16, 1.0, true))
    .collect();

  for (a, b) in sequential.iter().zip(&parallel) {
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.indices, b.indices);
  }
}

#[test]
fn test_homogeneous_fields_are_empty() {
  let solid = FieldFn(|_: Vec3| -1.0);
  let air = FieldFn(|_: Vec3| 1.0);

  let mesh = extract(&solid, Vec3::ZERO, 8, 1.0, true);
  assert!(mesh.is_empty());
  assert!(mesh.indices.is_empty());

  let mesh = extract(&air, Vec3::new(100.0, -50.0, 3.0), 8, 2.0, false);
  assert!(mesh.is_empty());
  assert!(!mesh.bounds.is_valid());
}

#[test]
fn test_field_sampled_once_per_lattice_point() {
  let field = CountingField {
    inner: centered_sphere(),
    calls: AtomicUsize::new(0),
  };

  extract(&field, Vec3::ZERO, 16, 1.0, true);
  assert_eq!(field.calls.load(Ordering::Relaxed), 17 * 17 * 17);

  field.calls.store(0, Ordering::Relaxed);
  extract(&field, Vec3::new(500.0, 0.0, 0.0), 4, 1.0, true);
  assert_eq!(field.calls.load(Ordering::Relaxed), 5 * 5 * 5);
}

#[test]
fn test_non_positive_voxel_count_is_empty() {
  let field = CountingField {
    inner: centered_sphere(),
    calls: AtomicUsize::new(0),
  };

  assert!(extract(&field, Vec3::ZERO, 0, 1.0, true).is_empty());
  assert!(extract(&field, Vec3::ZERO, -3, 1.0, true).is_empty());
  assert_eq!(field.calls.load(Ordering::Relaxed), 0);
}

#[test]
fn test_vertices_stay_inside_chunk() {
  let voxel_size = 0.5;
  let mesh = extract(&centered_sphere(), Vec3::new(2.0, 2.0, 2.0), 16, voxel_size, true);
  let extent = 16.0 * voxel_size;

  for p in &mesh.positions {
    for axis in 0..3 {
      assert!(p[axis] >= 0.0 && p[axis] <= extent, "vertex {:?} escaped chunk", p);
    }
  }
  assert!(mesh.bounds.is_valid());
}

#[test]
fn test_interpolated_vertices_hit_linear_crossing() {
  let plane = GroundPlaneField::new(4.3);
  let mesh = extract(&plane, Vec3::ZERO, 8, 1.0, true);

  assert!(!mesh.is_empty());
  for p in &mesh.positions {
    assert!((p[1] - 4.3).abs() < 1e-4, "vertex y = {}", p[1]);
  }
}

#[test]
fn test_midpoint_vertices_without_interpolation() {
  let plane = GroundPlaneField::new(4.3);
  let mesh = extract(&plane, Vec3::ZERO, 8, 1.0, false);

  assert!(!mesh.is_empty());
  for p in &mesh.positions {
    assert_eq!(p[1], 4.5);
  }
}

#[test]
fn test_interpolated_vertices_lie_on_their_cube_edge() {
  // Every vertex sits on an axis-aligned lattice edge: at least two of its
  // coordinates are integral.
  let mesh = extract(&centered_sphere(), Vec3::ZERO, 16, 1.0, true);

  for p in &mesh.positions {
    let integral = p.iter().filter(|c| (*c - c.round()).abs() < 1e-5).count();
    assert!(integral >= 2, "vertex {:?} is not on a lattice edge", p);
  }
}

#[test]
fn test_plane_normals_point_up() {
  let mesh = extract(&GroundPlaneField::new(4.3), Vec3::ZERO, 8, 1.0, true);
  for n in &mesh.normals {
    assert!(n[1] > 0.99, "normal {:?} does not face empty space", n);
  }
}

#[test]
fn test_sphere_normals_face_outward() {
  let sphere = centered_sphere();
  let mesh = extract(&sphere, Vec3::ZERO, 16, 1.0, true);

  for tri in mesh.indices.chunks_exact(3) {
    let a = Vec3::from(mesh.positions[tri[0] as usize]);
    let b = Vec3::from(mesh.positions[tri[1] as usize]);
    let c = Vec3::from(mesh.positions[tri[2] as usize]);
    let face = (b - a).cross(c - a);
    if face.length_squared() < 1e-8 {
      continue;
    }
    let centroid = (a + b + c) / 3.0;
    assert!(face.dot(centroid - sphere.center) > 0.0);
  }
}

#[test]
fn test_origin_offsets_sample_world_space() {
  let sphere = SphereField::new(Vec3::new(100.0, 0.0, -40.0), 4.0);
  let origin = Vec3::new(92.0, -8.0, -48.0);
  let mesh = extract(&sphere, origin, 16, 1.0, true);

  assert!(!mesh.is_empty());
  for p in &mesh.positions {
    let world = origin + Vec3::from(*p);
    assert!((world.distance(sphere.center) - sphere.radius).abs() < 0.5);
  }
}

#[test]
fn test_nan_samples_are_outside_and_counted() {
  // NaN over the lower half; a plane above it.
  let field = FieldFn(|p: Vec3| if p.y < 2.0 { f32::NAN } else { p.y - 5.5 });
  let mesh = extract(&field, Vec3::ZERO, 8, 1.0, true);

  // Rows y = 0 and y = 1 of a 9³ lattice.
  assert_eq!(mesh.nan_samples, 2 * 9 * 9);
  assert!(mesh
    .positions
    .iter()
    .all(|p| p.iter().all(|c| c.is_finite())));
  assert!(!mesh.is_empty());
}

#[test]
fn test_infinite_densities_keep_vertices_on_edges() {
  // Empty space above y = 4.5 reports +inf.
  let field = FieldFn(|p: Vec3| if p.y > 4.5 { f32::INFINITY } else { -1.0 });
  let mesh = extract(&field, Vec3::ZERO, 8, 1.0, true);

  assert!(!mesh.is_empty());
  for p in &mesh.positions {
    assert!(p.iter().all(|c| c.is_finite()), "non-finite vertex {:?}", p);
    // Crossing collapses onto the finite corner.
    assert_eq!(p[1], 4.0);
  }
  for n in &mesh.normals {
    assert!(n.iter().all(|c| c.is_finite()));
  }
  assert!(mesh.bounds.is_valid());
}

#[test]
fn test_reset_preserves_capacity() {
  let mut extractor = MarchingCubes::new();
  extractor.extract(&centered_sphere(), Vec3::ZERO, 16, 1.0, true);
  let capacity = extractor.output().positions.capacity();
  assert!(capacity > 0);

  extractor.reset();
  assert!(extractor.output().is_empty());
  assert_eq!(extractor.output().positions.capacity(), capacity);

  extractor.extract(&FieldFn(|_: Vec3| 1.0), Vec3::ZERO, 4, 1.0, true);
  assert_eq!(extractor.output().positions.capacity(), capacity);
}

#[test]
fn test_lattice_layout() {
  let mut lattice = SampleLattice::new();
  let field = FieldFn(|p: Vec3| p.x + 10.0 * p.y + 100.0 * p.z);
  lattice.fill(&field, Vec3::ZERO, 3, 1.0);

  assert_eq!(lattice.dim(), 4);
  assert_eq!(lattice.len(), 64);
  assert_eq!(lattice.get(1, 2, 3), 321.0);
  assert_eq!(lattice.get(3, 0, 0), 3.0);
  assert!(lattice.is_homogeneous());
}
