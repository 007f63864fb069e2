//! Field state and the per-frame update.
//!
//! [`OrbitField`] owns the particles, the flat position buffer and the CSS
//! colour strings the renderer reads. [`OrbitScene`] bundles the field with its camera, frame loop and
//! colour policy: it is created once when the component mounts, then mutated
//! by the animation loop, the resize listener and theme changes.

use rand::Rng;

use super::camera::Camera;
use super::config::FieldConfig;
use super::frame_loop::{FrameLoop, Generation};
use super::particles::{self, Particle};
use super::theme::PalettePolicy;
use crate::theme_store::ThemeMode;

/// Particles plus their derived positions.
///
/// The particle count is fixed at construction. Indices are stable: the
/// position buffer stores particle `i` at `positions[3 * i..3 * i + 3]` and
/// its fill colour at `css_colors[i]`.
#[derive(Clone, Debug)]
pub struct OrbitField {
	particles: Vec<Particle>,
	positions: Vec<f64>,
	css_colors: Vec<String>,
}

impl OrbitField {
	/// Spawn `config.count` particles coloured for `mode`.
	pub fn new<R: Rng + ?Sized>(
		config: &FieldConfig,
		palette: &PalettePolicy,
		mode: ThemeMode,
		rng: &mut R,
	) -> Self {
		let particles = particles::generate(config.count, config, palette, mode, rng);
		let mut field = Self {
			positions: vec![0.0; particles.len() * 3],
			css_colors: vec![String::new(); particles.len()],
			particles,
		};
		field.sync_positions();
		field.sync_colors();
		field
	}

	/// Number of particles.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// Whether the field has no particles.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Particles in index order.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Flat `[x, y, z]` triples, one per particle.
	pub fn positions(&self) -> &[f64] {
		&self.positions
	}

	/// Fill colour per particle as a CSS string. Rewritten only by
	/// [`recolor`](Self::recolor).
	pub fn css_colors(&self) -> &[String] {
		&self.css_colors
	}

	/// Advance every particle by its angular speed and rewrite the position
	/// buffer in place. Allocates nothing.
	pub fn tick(&mut self) {
		for p in &mut self.particles {
			p.advance();
		}
		self.sync_positions();
	}

	/// Redraw every particle's colour for `mode`. Motion state is untouched.
	pub fn recolor<R: Rng + ?Sized>(
		&mut self,
		palette: &PalettePolicy,
		mode: ThemeMode,
		rng: &mut R,
	) {
		for p in &mut self.particles {
			p.set_color(palette.sample(mode, rng));
		}
		self.sync_colors();
	}

	fn sync_positions(&mut self) {
		for (p, slot) in self.particles.iter().zip(self.positions.chunks_exact_mut(3)) {
			let (x, y) = p.position();
			slot[0] = x;
			slot[1] = y;
			slot[2] = 0.0;
		}
	}

	fn sync_colors(&mut self) {
		for (p, css) in self.particles.iter().zip(&mut self.css_colors) {
			// Writing into a String cannot fail.
			let _ = p.color().write_css(css);
		}
	}
}

/// Everything one mounted background needs between frames.
#[derive(Debug)]
pub struct OrbitScene {
	/// Particle state.
	pub field: OrbitField,
	/// Projection for the current viewport.
	pub camera: Camera,
	/// Scheduling state of the animation.
	pub frame_loop: FrameLoop,
	palette: PalettePolicy,
	mode: ThemeMode,
}

impl OrbitScene {
	/// Build a scene for a `width` × `height` viewport.
	pub fn new<R: Rng + ?Sized>(
		config: &FieldConfig,
		mode: ThemeMode,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> Self {
		Self {
			field: OrbitField::new(config, &config.palette, mode, rng),
			camera: Camera::new(config.camera.clone(), width, height),
			frame_loop: FrameLoop::new(),
			palette: config.palette.clone(),
			mode,
		}
	}

	/// Theme the particles are currently coloured for.
	pub fn mode(&self) -> ThemeMode {
		self.mode
	}

	/// Run one frame for `generation`. Returns `false` (and leaves the field
	/// untouched) when the loop has been stopped or restarted since.
	pub fn frame(&mut self, generation: Generation) -> bool {
		if !self.frame_loop.begin_frame(generation) {
			return false;
		}
		self.field.tick();
		true
	}

	/// Apply a theme change. Recolours every live particle once per actual
	/// transition; repeated notifications for the same mode are ignored.
	pub fn set_theme<R: Rng + ?Sized>(&mut self, mode: ThemeMode, rng: &mut R) -> bool {
		if mode == self.mode {
			return false;
		}
		self.mode = mode;
		self.field.recolor(&self.palette, mode, rng);
		true
	}

	/// Forward a window resize to the camera. Returns the new surface size
	/// when it changed; `None` once the loop has stopped.
	pub fn resize(&mut self, width: f64, height: f64) -> Option<(u32, u32)> {
		if !self.frame_loop.is_running() {
			return None;
		}
		self.camera
			.resize(width, height)
			.then(|| (self.camera.width(), self.camera.height()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn field(count: usize, mode: ThemeMode, seed: u64) -> OrbitField {
		let config = FieldConfig {
			count,
			..FieldConfig::default()
		};
		OrbitField::new(&config, &config.palette, mode, &mut StdRng::seed_from_u64(seed))
	}

	fn scene(count: usize, mode: ThemeMode) -> OrbitScene {
		let config = FieldConfig {
			count,
			..FieldConfig::default()
		};
		OrbitScene::new(&config, mode, 800.0, 600.0, &mut StdRng::seed_from_u64(99))
	}

	/// Motion state of every particle, for before/after comparisons.
	fn motion(field: &OrbitField) -> Vec<(u64, u64, u64, u64)> {
		field
			.particles()
			.iter()
			.map(|p| {
				(
					p.angle().to_bits(),
					p.radius().to_bits(),
					p.angular_speed().to_bits(),
					p.size().to_bits(),
				)
			})
			.collect()
	}

	fn assert_positions_match(field: &OrbitField) {
		for (p, xyz) in field.particles().iter().zip(field.positions().chunks_exact(3)) {
			assert!((xyz[0] - p.radius() * p.angle().cos()).abs() < 1e-6);
			assert!((xyz[1] - p.radius() * p.angle().sin()).abs() < 1e-6);
			assert_eq!(xyz[2], 0.0);
		}
	}

	#[test]
	fn empty_field() {
		let mut f = field(0, ThemeMode::Light, 1);
		assert!(f.is_empty());
		f.tick();
		assert!(f.positions().is_empty());
	}

	#[test]
	fn count_never_changes() {
		let mut f = field(37, ThemeMode::Dark, 2);
		for _ in 0..100 {
			f.tick();
		}
		let mut rng = StdRng::seed_from_u64(3);
		f.recolor(&PalettePolicy::default(), ThemeMode::Light, &mut rng);
		assert_eq!(f.len(), 37);
		assert_eq!(f.positions().len(), 37 * 3);
	}

	#[test]
	fn positions_are_derived_on_creation() {
		assert_positions_match(&field(50, ThemeMode::Dark, 4));
	}

	#[test]
	fn tick_accumulates_angle_and_keeps_radius() {
		let mut f = field(20, ThemeMode::Dark, 5);
		let before = f.particles().to_vec();

		const TICKS: usize = 240;
		for _ in 0..TICKS {
			f.tick();
		}

		for (old, new) in before.iter().zip(f.particles()) {
			assert_eq!(new.radius().to_bits(), old.radius().to_bits());
			assert_eq!(new.size().to_bits(), old.size().to_bits());
			let expected = old.angle() + TICKS as f64 * old.angular_speed();
			assert!((new.angle() - expected).abs() < 1e-9);
		}
		assert_positions_match(&f);
	}

	#[test]
	fn tick_reuses_position_buffer() {
		let mut f = field(10, ThemeMode::Dark, 6);
		let ptr = f.positions().as_ptr();
		f.tick();
		f.tick();
		assert_eq!(f.positions().as_ptr(), ptr);
	}

	#[test]
	fn recolor_changes_only_colors() {
		let mut f = field(200, ThemeMode::Dark, 7);
		for _ in 0..10 {
			f.tick();
		}
		let motion_before = motion(&f);
		let positions_before = f.positions().to_vec();

		let mut rng = StdRng::seed_from_u64(8);
		f.recolor(&PalettePolicy::default(), ThemeMode::Light, &mut rng);

		assert_eq!(motion(&f), motion_before);
		assert_eq!(f.positions(), positions_before.as_slice());
	}

	#[test]
	fn css_colors_follow_recolor_not_tick() {
		let mut f = field(40, ThemeMode::Dark, 12);
		for (p, css) in f.particles().iter().zip(f.css_colors()) {
			assert_eq!(*css, p.color().to_css());
		}

		let cached = f.css_colors().to_vec();
		let ptrs: Vec<_> = f.css_colors().iter().map(|c| c.as_ptr()).collect();
		for _ in 0..5 {
			f.tick();
		}
		assert_eq!(f.css_colors(), cached.as_slice());
		let after_tick: Vec<_> = f.css_colors().iter().map(|c| c.as_ptr()).collect();
		assert_eq!(after_tick, ptrs);

		let mut rng = StdRng::seed_from_u64(13);
		f.recolor(&PalettePolicy::default(), ThemeMode::Light, &mut rng);
		assert_eq!(f.css_colors().len(), 40);
		assert_ne!(f.css_colors(), cached.as_slice());
		for (p, css) in f.particles().iter().zip(f.css_colors()) {
			assert_eq!(*css, p.color().to_css());
		}
	}

	#[test]
	fn theme_toggle_recolors_every_particle() {
		let mut s = scene(3, ThemeMode::Light);
		let colors_before: Vec<_> = s.field.particles().iter().map(|p| p.color()).collect();
		let motion_before = motion(&s.field);

		assert!(s.set_theme(ThemeMode::Dark, &mut StdRng::seed_from_u64(10)));

		for (p, old) in s.field.particles().iter().zip(&colors_before) {
			assert_ne!(p.color(), *old);
		}
		assert_eq!(motion(&s.field), motion_before);
		assert_eq!(s.field.len(), 3);
		assert_eq!(s.mode(), ThemeMode::Dark);
	}

	#[test]
	fn same_theme_does_not_recolor() {
		let mut s = scene(5, ThemeMode::Dark);
		let before: Vec<_> = s.field.particles().iter().map(|p| p.color()).collect();
		assert!(!s.set_theme(ThemeMode::Dark, &mut StdRng::seed_from_u64(11)));
		let after: Vec<_> = s.field.particles().iter().map(|p| p.color()).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn resize_updates_aspect_only() {
		let mut s = scene(25, ThemeMode::Dark);
		s.frame_loop.start();
		let motion_before = motion(&s.field);
		let positions_before = s.field.positions().to_vec();

		assert_eq!(s.resize(1600.0, 900.0), Some((1600, 900)));
		assert_eq!(s.camera.aspect(), 1600.0 / 900.0);
		assert_eq!(s.resize(1600.0, 900.0), None);

		assert_eq!(motion(&s.field), motion_before);
		assert_eq!(s.field.positions(), positions_before.as_slice());
	}

	#[test]
	fn frames_advance_until_stopped() {
		let mut s = scene(10, ThemeMode::Dark);
		let generation = s.frame_loop.start();
		assert!(s.frame(generation));

		s.frame_loop.stop();
		let positions = s.field.positions().to_vec();
		let motion_before = motion(&s.field);

		// A callback that was already queued fires after teardown.
		assert!(!s.frame(generation));
		assert_eq!(s.field.positions(), positions.as_slice());
		assert_eq!(motion(&s.field), motion_before);
	}

	#[test]
	fn resize_after_stop_is_ignored() {
		let mut s = scene(10, ThemeMode::Dark);
		s.frame_loop.start();
		s.frame_loop.stop();
		assert_eq!(s.resize(1920.0, 1080.0), None);
		assert_eq!(s.camera.aspect(), 800.0 / 600.0);
	}
}
