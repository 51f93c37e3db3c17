use std::f64::consts::PI;

use glam::{DMat4, DVec3, DVec4};

use crate::config::CameraConfig;

const NEAR: f64 = 1.0;
const FAR: f64 = 100_000.0;
/// Radians of orbit per dragged pixel.
const ORBIT_SPEED: f64 = 0.005;
/// Keeps the orbit away from the poles, where `up` would flip.
const POLE_MARGIN: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pose {
	position: DVec3,
	target: DVec3,
}

#[derive(Clone, Copy, Debug)]
struct Transition {
	from: Pose,
	to: Pose,
	start_ms: f64,
}

/// A point after projection onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	/// Distance along the view axis; larger is farther away.
	pub depth: f64,
	/// Screen pixels per world unit at this depth.
	pub scale: f64,
}

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Perspective camera looking at `target`. Zoom, reset and pan requests
/// ease towards their destination over `transition_ms`.
#[derive(Clone, Debug)]
pub struct Camera {
	pose: Pose,
	transition: Option<Transition>,
	config: CameraConfig,
}

impl Camera {
	pub fn new(config: &CameraConfig) -> Self {
		Self {
			pose: Self::home(config),
			transition: None,
			config: config.clone(),
		}
	}

	fn home(config: &CameraConfig) -> Pose {
		Pose {
			position: DVec3::new(0.0, 0.0, config.default_distance),
			target: DVec3::ZERO,
		}
	}

	#[cfg(test)]
	pub fn position(&self) -> DVec3 {
		self.pose.position
	}

	#[cfg(test)]
	pub fn target(&self) -> DVec3 {
		self.pose.target
	}

	/// Distance from the world origin.
	#[cfg(test)]
	pub fn distance(&self) -> f64 {
		self.pose.position.length()
	}

	#[cfg(test)]
	pub fn is_moving(&self) -> bool {
		self.transition.is_some()
	}

	/// Where the camera ends up once the running transition completes.
	fn destination(&self) -> Pose {
		self.transition.map_or(self.pose, |t| t.to)
	}

	fn animate_to(&mut self, to: Pose, now_ms: f64) {
		if self.config.transition_ms <= 0.0 {
			self.pose = to;
			self.transition = None;
			return;
		}
		self.transition = Some(Transition {
			from: self.pose,
			to,
			start_ms: now_ms,
		});
	}

	fn settle(&mut self) {
		self.pose = self.destination();
		self.transition = None;
	}

	/// Divides the distance from the origin by `factor` (clamped), so values
	/// above 1 move closer.
	pub fn zoom_by(&mut self, factor: f64, now_ms: f64) {
		if factor <= 0.0 || !factor.is_finite() {
			return;
		}
		let dest = self.destination();
		let current = dest.position.length();
		let direction = if current > f64::EPSILON {
			dest.position / current
		} else {
			DVec3::Z
		};
		let distance =
			(current / factor).clamp(self.config.min_distance, self.config.max_distance);
		self.animate_to(
			Pose {
				position: direction * distance,
				target: dest.target,
			},
			now_ms,
		);
	}

	pub fn zoom_in(&mut self, now_ms: f64) {
		self.zoom_by(self.config.zoom_factor, now_ms);
	}

	pub fn zoom_out(&mut self, now_ms: f64) {
		self.zoom_by(1.0 / self.config.zoom_factor, now_ms);
	}

	/// Back to the canonical distance, looking at the origin.
	pub fn reset(&mut self, now_ms: f64) {
		self.animate_to(Self::home(&self.config), now_ms);
	}

	/// Moves the content by `dx`/`dy` screen-oriented world units; the camera
	/// itself moves the opposite way.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.settle();
		let (right, up) = self.axes();
		let shift = -right * dx + up * dy;
		self.pose.position += shift;
		self.pose.target += shift;
	}

	/// Rotates around the target by a pointer drag of `dx`/`dy` pixels.
	pub fn orbit(&mut self, dx: f64, dy: f64) {
		self.settle();
		let offset = self.pose.position - self.pose.target;
		let radius = offset.length();
		if radius < f64::EPSILON {
			return;
		}
		let theta = offset.x.atan2(offset.z) - dx * ORBIT_SPEED;
		let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() - dy * ORBIT_SPEED)
			.clamp(POLE_MARGIN, PI - POLE_MARGIN);
		let offset = DVec3::new(
			phi.sin() * theta.sin(),
			phi.cos(),
			phi.sin() * theta.cos(),
		) * radius;
		self.pose.position = self.pose.target + offset;
	}

	/// Advances the running transition. Returns whether the camera moved.
	pub fn tick(&mut self, now_ms: f64) -> bool {
		let Some(transition) = self.transition else {
			return false;
		};
		let t = ((now_ms - transition.start_ms) / self.config.transition_ms).clamp(0.0, 1.0);
		let eased = ease_out_cubic(t);
		self.pose = Pose {
			position: transition.from.position.lerp(transition.to.position, eased),
			target: transition.from.target.lerp(transition.to.target, eased),
		};
		if t >= 1.0 {
			self.transition = None;
		}
		true
	}

	/// Screen-aligned right and up vectors in world space.
	fn axes(&self) -> (DVec3, DVec3) {
		let forward = (self.pose.target - self.pose.position).normalize_or_zero();
		let mut right = forward.cross(DVec3::Y).normalize_or_zero();
		if right == DVec3::ZERO {
			right = DVec3::X;
		}
		(right, right.cross(forward).normalize_or_zero())
	}

	fn fov(&self) -> f64 {
		self.config.fov_degrees.to_radians()
	}

	fn view_projection(&self, width: f64, height: f64) -> DMat4 {
		let aspect = if height > 0.0 { width / height } else { 1.0 };
		let projection = DMat4::perspective_rh(self.fov(), aspect, NEAR, FAR);
		let view = DMat4::look_at_rh(self.pose.position, self.pose.target, DVec3::Y);
		projection * view
	}

	/// Projects every point with one matrix. `None` for points behind the
	/// near plane.
	pub fn project_all<'a>(
		&self,
		points: impl IntoIterator<Item = &'a DVec3>,
		width: f64,
		height: f64,
	) -> Vec<Option<Projected>> {
		let matrix = self.view_projection(width, height);
		let focal = 0.5 * height / (0.5 * self.fov()).tan();
		points
			.into_iter()
			.map(|p| {
				let clip: DVec4 = matrix * p.extend(1.0);
				if clip.w < NEAR {
					return None;
				}
				let ndc = clip.truncate() / clip.w;
				Some(Projected {
					x: (ndc.x + 1.0) * 0.5 * width,
					y: (1.0 - ndc.y) * 0.5 * height,
					depth: clip.w,
					scale: focal / clip.w,
				})
			})
			.collect()
	}

	#[cfg(test)]
	pub fn project(&self, point: DVec3, width: f64, height: f64) -> Option<Projected> {
		self.project_all([&point], width, height).pop().flatten()
	}
}
