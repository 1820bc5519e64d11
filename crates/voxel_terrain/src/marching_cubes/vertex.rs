//! Edge crossing placement.

use glam::Vec3;

/// Parameter along an edge where the density crosses zero.
///
/// `t = d_a / (d_a - d_b)`, clamped to `[0, 1]`. Falls back to the midpoint
/// when both densities are equal.
///
/// An infinite density pushes the crossing onto the finite corner; two
/// infinite densities give the midpoint.
#[inline(always)]
pub fn edge_parameter(density_a: f32, density_b: f32) -> f32 {
  let denom = density_a - density_b;
  if denom == 0.0 {
    return 0.5;
  }

  let t = density_a / denom;
  if t.is_nan() {
    // inf / inf
    return match (density_a.is_finite(), density_b.is_finite()) {
      (true, false) => 0.0,
      (false, true) => 1.0,
      _ => 0.5,
    };
  }
  t.clamp(0.0, 1.0)
}

/// Crossing point between two lattice corners.
#[inline(always)]
pub fn edge_vertex(a: Vec3, b: Vec3, density_a: f32, density_b: f32, interpolate: bool) -> Vec3 {
  let t = if interpolate {
    edge_parameter(density_a, density_b)
  } else {
    0.5
  };
  a + (b - a) * t
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_edge_parameter_linear() {
    assert_eq!(edge_parameter(-1.0, 1.0), 0.5);
    assert_eq!(edge_parameter(-1.0, 3.0), 0.25);
    assert_eq!(edge_parameter(3.0, -1.0), 0.75);
  }

  #[test]
  fn test_edge_parameter_clamped_and_degenerate() {
    assert_eq!(edge_parameter(0.0, 0.0), 0.5);
    assert_eq!(edge_parameter(2.0, 1.0), 1.0);
    assert_eq!(edge_parameter(-1.0, -2.0), 0.0);
  }

  #[test]
  fn test_edge_parameter_infinite_densities() {
    assert_eq!(edge_parameter(f32::INFINITY, -1.0), 1.0);
    assert_eq!(edge_parameter(-1.0, f32::INFINITY), 0.0);
    assert_eq!(edge_parameter(f32::NEG_INFINITY, 2.0), 1.0);
    assert_eq!(edge_parameter(2.0, f32::NEG_INFINITY), 0.0);
    assert_eq!(edge_parameter(f32::INFINITY, f32::NEG_INFINITY), 0.5);
    assert_eq!(edge_parameter(f32::NEG_INFINITY, f32::INFINITY), 0.5);
  }

  #[test]
  fn test_edge_vertex_midpoint_without_interpolation() {
    let v = edge_vertex(Vec3::ZERO, Vec3::X, -0.1, 5.0, false);
    assert_eq!(v, Vec3::new(0.5, 0.0, 0.0));
  }

  #[test]
  fn test_edge_vertex_interpolated() {
    let v = edge_vertex(Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0), -1.0, 3.0, true);
    assert_eq!(v, Vec3::new(0.0, 1.0, 0.0));
  }
}
