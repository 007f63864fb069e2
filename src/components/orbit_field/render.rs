//! Canvas rendering for the orbit field.
//!
//! The canvas is transparent; the themed gradient is painted by the container
//! behind it. Each frame clears the surface and draws every particle as a
//! filled disc, projected through the scene camera.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::state::OrbitScene;

/// Discs smaller than this are still drawn at this diameter.
const MIN_DIAMETER: f64 = 0.5;

/// Draws the current frame. Reads the scene, never mutates it, and borrows
/// the cached colour strings instead of formatting new ones.
pub fn render(scene: &OrbitScene, ctx: &CanvasRenderingContext2d) {
	let camera = &scene.camera;
	let (width, height) = (camera.width() as f64, camera.height() as f64);
	ctx.clear_rect(0.0, 0.0, width, height);

	let field = &scene.field;
	let particles = field.particles().iter().zip(field.css_colors());
	for ((p, css), xyz) in particles.zip(field.positions().chunks_exact(3)) {
		let Some(point) = camera.project(xyz[0], xyz[1], xyz[2]) else {
			continue;
		};
		let radius = camera.point_diameter(p.size(), point.depth).max(MIN_DIAMETER) / 2.0;
		if point.x + radius < 0.0
			|| point.y + radius < 0.0
			|| point.x - radius > width
			|| point.y - radius > height
		{
			continue;
		}

		ctx.set_fill_style_str(css);
		ctx.begin_path();
		let _ = ctx.arc(point.x, point.y, radius, 0.0, TAU);
		ctx.fill();
	}
}
