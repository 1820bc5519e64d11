//! Free camera driven by a scripted input path.
//!
//! The camera moves along its forward/right vectors at `move_speed * dt` and
//! rotates by yaw around +Y, then pitch around -X:
//!
//! ```text
//!   rotation = yaw(Y) * pitch(-X)
//!   forward  = rotation * +Z
//!   right    = rotation * +X
//! ```
//!
//! Input comes from a [`CameraScript`] instead of a keyboard, so runs are
//! reproducible.

use glam::{Quat, Vec3};
use serde::Deserialize;

/// Pitch is kept just short of straight up/down.
const PITCH_LIMIT: f32 = 89.0;

// =============================================================================
// Camera
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct FlyCamera {
	pub position: Vec3,
	/// Horizontal rotation in degrees.
	pub yaw: f32,
	/// Vertical rotation in degrees.
	pub pitch: f32,
	/// Movement speed in units per second.
	pub move_speed: f32,
}

impl Default for FlyCamera {
	fn default() -> Self {
		Self {
			position: Vec3::ZERO,
			yaw: 0.0,
			pitch: 0.0,
			move_speed: 10.0,
		}
	}
}

impl FlyCamera {
	pub fn new(position: Vec3, yaw: f32, pitch: f32, move_speed: f32) -> Self {
		Self {
			position,
			yaw,
			pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
			move_speed,
		}
	}

	#[inline]
	pub fn rotation(&self) -> Quat {
		Quat::from_axis_angle(Vec3::Y, self.yaw.to_radians())
			* Quat::from_axis_angle(Vec3::NEG_X, self.pitch.to_radians())
	}

	#[inline]
	pub fn forward(&self) -> Vec3 {
		self.rotation() * Vec3::Z
	}

	#[inline]
	pub fn right(&self) -> Vec3 {
		self.rotation() * Vec3::X
	}

	/// Apply one frame of input. Rotation first, then movement along the new axes.
	pub fn advance(&mut self, input: &CameraInput, dt: f32) {
		self.yaw = (self.yaw + input.yaw_rate * dt).rem_euclid(360.0);
		self.pitch = (self.pitch + input.pitch_rate * dt).clamp(-PITCH_LIMIT, PITCH_LIMIT);

		let step = self.move_speed * dt;
		self.position += self.forward() * (input.forward * step);
		self.position += self.right() * (input.right * step);
	}
}

// =============================================================================
// Scripted input
// =============================================================================

/// Per-frame input, the scripted stand-in for WASD and mouse.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraInput {
	/// +1 forward (W), -1 back (S).
	pub forward: f32,
	/// +1 right (D), -1 left (A).
	pub right: f32,
	/// Degrees per second.
	pub yaw_rate: f32,
	/// Degrees per second.
	pub pitch_rate: f32,
}

impl CameraInput {
	/// Straight ahead at full speed.
	pub const CRUISE: Self = Self {
		forward: 1.0,
		right: 0.0,
		yaw_rate: 0.0,
		pitch_rate: 0.0,
	};
}

/// Constant input held for `duration` seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSegment {
	pub duration: f32,
	pub forward: f32,
	pub right: f32,
	pub yaw_rate: f32,
	pub pitch_rate: f32,
}

impl CameraSegment {
	#[inline]
	pub fn input(&self) -> CameraInput {
		CameraInput {
			forward: self.forward.clamp(-1.0, 1.0),
			right: self.right.clamp(-1.0, 1.0),
			yaw_rate: self.yaw_rate,
			pitch_rate: self.pitch_rate,
		}
	}
}

/// Ordered list of segments. An empty script cruises forward forever.
#[derive(Clone, Debug, Default)]
pub struct CameraScript {
	segments: Vec<CameraSegment>,
	looped: bool,
	total: f32,
}

impl CameraScript {
	pub fn new(segments: Vec<CameraSegment>, looped: bool) -> Self {
		let total = segments.iter().map(|s| s.duration.max(0.0)).sum();
		Self {
			segments,
			looped,
			total,
		}
	}

	/// Total scripted time in seconds.
	pub fn duration(&self) -> f32 {
		self.total
	}

	/// Input active at time `t`. Past the end: loop, or hold still.
	pub fn input_at(&self, t: f32) -> CameraInput {
		if self.segments.is_empty() || self.total <= 0.0 {
			return CameraInput::CRUISE;
		}

		let mut t = t.max(0.0);
		if t >= self.total {
			if !self.looped {
				return CameraInput::default();
			}
			t = t.rem_euclid(self.total);
		}

		let mut start = 0.0;
		for segment in &self.segments {
			let end = start + segment.duration.max(0.0);
			if t < end {
				return segment.input();
			}
			start = end;
		}

		// Float slop at the very end of the last segment
		self.segments
			.last()
			.map(CameraSegment::input)
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f32 = 1e-4;

	fn segment(duration: f32, forward: f32, yaw_rate: f32) -> CameraSegment {
		CameraSegment {
			duration,
			forward,
			yaw_rate,
			..Default::default()
		}
	}

	#[test]
	fn test_default_axes() {
		let cam = FlyCamera::default();
		assert!(cam.forward().abs_diff_eq(Vec3::Z, EPS));
		assert!(cam.right().abs_diff_eq(Vec3::X, EPS));
	}

	#[test]
	fn test_yaw_turns_forward_toward_right() {
		let cam = FlyCamera::new(Vec3::ZERO, 90.0, 0.0, 10.0);
		assert!(cam.forward().abs_diff_eq(Vec3::X, EPS));
		assert!(cam.right().abs_diff_eq(Vec3::NEG_Z, EPS));
	}

	#[test]
	fn test_positive_pitch_looks_up() {
		let cam = FlyCamera::new(Vec3::ZERO, 0.0, 30.0, 10.0);
		assert!(cam.forward().y > 0.0);
		assert!((cam.forward().length() - 1.0).abs() < EPS);
	}

	#[test]
	fn test_pitch_clamped() {
		let mut cam = FlyCamera::default();
		let input = CameraInput {
			pitch_rate: 1000.0,
			..Default::default()
		};
		cam.advance(&input, 1.0);
		assert_eq!(cam.pitch, PITCH_LIMIT);
	}

	#[test]
	fn test_advance_moves_speed_times_dt() {
		let mut cam = FlyCamera::default();
		cam.advance(&CameraInput::CRUISE, 0.5);
		assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), EPS));

		let strafe = CameraInput {
			right: -1.0,
			..Default::default()
		};
		cam.advance(&strafe, 1.0);
		assert!(cam.position.abs_diff_eq(Vec3::new(-10.0, 0.0, 5.0), EPS));
	}

	#[test]
	fn test_empty_script_cruises() {
		let script = CameraScript::new(Vec::new(), false);
		assert_eq!(script.input_at(0.0), CameraInput::CRUISE);
		assert_eq!(script.input_at(1e6), CameraInput::CRUISE);
	}

	#[test]
	fn test_script_segments_in_order() {
		let script = CameraScript::new(vec![segment(1.0, 1.0, 0.0), segment(2.0, 0.0, 45.0)], false);
		assert_eq!(script.duration(), 3.0);
		assert_eq!(script.input_at(0.5).forward, 1.0);
		assert_eq!(script.input_at(1.5).yaw_rate, 45.0);
		assert_eq!(script.input_at(1.5).forward, 0.0);
		// Finished, not looped: hold still
		assert_eq!(script.input_at(3.5), CameraInput::default());
	}

	#[test]
	fn test_looped_script_wraps() {
		let script = CameraScript::new(vec![segment(1.0, 1.0, 0.0), segment(1.0, -1.0, 0.0)], true);
		assert_eq!(script.input_at(2.25).forward, 1.0);
		assert_eq!(script.input_at(3.25).forward, -1.0);
	}

	#[test]
	fn test_segment_input_clamped() {
		let input = segment(1.0, 5.0, 0.0).input();
		assert_eq!(input.forward, 1.0);
	}
}
