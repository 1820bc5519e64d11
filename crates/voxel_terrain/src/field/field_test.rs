use super::*;

#[test]
fn test_sphere_sign_convention() {
  let sphere = SphereField::new(Vec3::new(8.0, 8.0, 8.0), 4.0);
  assert!(sphere.sample(Vec3::new(8.0, 8.0, 8.0)) < 0.0);
  assert!(sphere.sample(Vec3::new(0.0, 0.0, 0.0)) > 0.0);
  assert!(sphere.sample(Vec3::new(12.0, 8.0, 8.0)).abs() < 1e-5);
}

#[test]
fn test_ground_plane_sign_convention() {
  let ground = GroundPlaneField::new(3.0);
  assert!(ground.sample(Vec3::new(100.0, 2.0, -50.0)) < 0.0);
  assert!(ground.sample(Vec3::new(100.0, 4.0, -50.0)) > 0.0);
}

#[test]
fn test_closure_adapter_and_pointers() {
  let field = FieldFn(|p: Vec3| p.y - 1.0);
  assert_eq!(field.sample(Vec3::new(0.0, 3.0, 0.0)), 2.0);

  let boxed: Box<dyn ScalarField + Send + Sync> = Box::new(GroundPlaneField::new(1.0));
  assert_eq!(boxed.sample(Vec3::new(0.0, 3.0, 0.0)), 2.0);

  let shared = Arc::new(GroundPlaneField::new(1.0));
  assert_eq!(shared.sample(Vec3::new(0.0, 3.0, 0.0)), 2.0);
  assert_eq!((&shared).sample(Vec3::new(0.0, 0.0, 0.0)), -1.0);
}

#[test]
fn test_terrain_is_deterministic() {
  let a = PerlinTerrainField::new(42);
  let b = PerlinTerrainField::new(42);
  for i in 0..32 {
    let p = Vec3::new(i as f32 * 3.7, i as f32 * 0.25 - 4.0, -(i as f32) * 1.3);
    assert_eq!(a.sample(p), b.sample(p));
  }
}

#[test]
fn test_terrain_is_solid_deep_and_empty_high() {
  let terrain = PerlinTerrainField::default();
  for i in 0..16 {
    let x = i as f32 * 5.3;
    let z = i as f32 * -2.9;
    assert!(terrain.sample(Vec3::new(x, -20.0, z)) < 0.0, "column {} not solid below", i);
    assert!(terrain.sample(Vec3::new(x, 40.0, z)) > 0.0, "column {} not empty above", i);
  }
}

#[test]
fn test_terrain_height01_range() {
  let terrain = PerlinTerrainField::new(7);
  for i in 0..64 {
    let h = terrain.height01(i as f32 * 1.7, i as f32 * -0.9);
    assert!((0.0..=1.0).contains(&h));
  }
}
