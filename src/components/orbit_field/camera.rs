//! Perspective projection for the orbital plane.
//!
//! The camera sits on the +z axis looking at the origin, so the field centre
//! always lands in the middle of the surface. Resizing recomputes the aspect
//! ratio and pixel size; it never touches particle state.

use super::config::CameraConfig;

/// A point projected into surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
	/// Pixels from the left edge.
	pub x: f64,
	/// Pixels from the top edge.
	pub y: f64,
	/// Distance from the eye along the view axis.
	pub depth: f64,
}

/// Viewport-sized perspective camera.
#[derive(Clone, Debug)]
pub struct Camera {
	config: CameraConfig,
	width: u32,
	height: u32,
	aspect: f64,
	/// `1 / tan(fov / 2)`.
	focal: f64,
}

impl Camera {
	/// Camera for a `width` × `height` viewport.
	pub fn new(config: CameraConfig, width: f64, height: f64) -> Self {
		let fov = config.fov_degrees.clamp(1.0, 179.0).to_radians();
		let mut camera = Self {
			config,
			width: 1,
			height: 1,
			aspect: 1.0,
			focal: 1.0 / (fov / 2.0).tan(),
		};
		camera.resize(width, height);
		camera
	}

	/// Match the viewport to new window dimensions, clamped to at least 1×1.
	///
	/// Returns `true` when the pixel size actually changed, so repeated
	/// identical resize events are no-ops for the caller.
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		let (w, h) = (clamp_dimension(width), clamp_dimension(height));
		if (w, h) == (self.width, self.height) {
			return false;
		}
		self.width = w;
		self.height = h;
		self.aspect = w as f64 / h as f64;
		true
	}

	/// Surface width in pixels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Surface height in pixels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Width over height.
	pub fn aspect(&self) -> f64 {
		self.aspect
	}

	/// Project a scene point to surface pixels, or `None` if it falls outside
	/// the near/far planes.
	pub fn project(&self, x: f64, y: f64, z: f64) -> Option<ScreenPoint> {
		let depth = self.config.distance - z;
		if depth < self.config.near || depth > self.config.far {
			return None;
		}
		let ndc_x = x * self.focal / (self.aspect * depth);
		let ndc_y = y * self.focal / depth;
		Some(ScreenPoint {
			x: (ndc_x + 1.0) * 0.5 * self.width as f64,
			y: (1.0 - ndc_y) * 0.5 * self.height as f64,
			depth,
		})
	}

	/// On-screen diameter in pixels of a point sprite of `size` at `depth`.
	pub fn point_diameter(&self, size: f64, depth: f64) -> f64 {
		size * self.config.point_scale / depth
	}
}

fn clamp_dimension(value: f64) -> u32 {
	if value.is_finite() && value >= 1.0 {
		value.min(u32::MAX as f64) as u32
	} else {
		1
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn resize_sets_exact_aspect() {
		let mut camera = Camera::new(CameraConfig::default(), 800.0, 600.0);
		assert_eq!(camera.aspect(), 800.0 / 600.0);
		assert!(camera.resize(1600.0, 900.0));
		assert_eq!(camera.aspect(), 1600.0 / 900.0);
		assert_eq!((camera.width(), camera.height()), (1600, 900));
	}

	#[test]
	fn repeated_resize_is_noop() {
		let mut camera = Camera::new(CameraConfig::default(), 1024.0, 768.0);
		assert!(!camera.resize(1024.0, 768.0));
		assert!(!camera.resize(1024.0, 768.0));
		assert_eq!(camera.aspect(), 1024.0 / 768.0);
	}

	#[test]
	fn degenerate_viewport_clamps_to_one() {
		let mut camera = Camera::new(CameraConfig::default(), 0.0, 0.0);
		assert_eq!((camera.width(), camera.height()), (1, 1));
		assert_eq!(camera.aspect(), 1.0);

		camera.resize(f64::NAN, -20.0);
		assert_eq!((camera.width(), camera.height()), (1, 1));
		assert!(camera.aspect().is_finite());
	}

	#[test]
	fn origin_projects_to_centre() {
		let camera = Camera::new(CameraConfig::default(), 800.0, 600.0);
		let p = camera.project(0.0, 0.0, 0.0).unwrap();
		assert_eq!((p.x, p.y), (400.0, 300.0));
		assert_eq!(p.depth, 500.0);
	}

	#[test]
	fn vertical_extent_matches_fov() {
		// At depth d the visible half-height is d * tan(fov / 2).
		let camera = Camera::new(CameraConfig::default(), 800.0, 600.0);
		let half = 500.0 * (45.0_f64.to_radians() / 2.0).tan();
		let top = camera.project(0.0, half, 0.0).unwrap();
		assert!(top.y.abs() < 1e-9);
		let right = camera.project(half * camera.aspect(), 0.0, 0.0).unwrap();
		assert!((right.x - 800.0).abs() < 1e-9);
	}

	#[test]
	fn points_behind_near_plane_are_culled() {
		let camera = Camera::new(CameraConfig::default(), 800.0, 600.0);
		assert!(camera.project(0.0, 0.0, 499.5).is_none());
		assert!(camera.project(0.0, 0.0, -1600.0).is_none());
	}

	#[test]
	fn point_size_attenuates_with_depth() {
		let camera = Camera::new(CameraConfig::default(), 800.0, 600.0);
		assert_eq!(camera.point_diameter(5.0, 500.0), 3.0);
		assert!(camera.point_diameter(5.0, 1000.0) < camera.point_diameter(5.0, 500.0));
	}
}
