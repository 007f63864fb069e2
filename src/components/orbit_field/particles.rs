//! Orbiting background particles.

use std::f64::consts::TAU;

use rand::Rng;

use super::config::FieldConfig;
use super::theme::{Color, PalettePolicy};
use crate::theme_store::ThemeMode;

/// A single point orbiting the field centre.
///
/// Only `angle` (every frame) and `color` (on theme change) ever change after
/// creation; the rest is fixed at spawn and exposed read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	angle: f64,
	radius: f64,
	angular_speed: f64,
	size: f64,
	color: Color,
}

impl Particle {
	/// Draw a fresh particle coloured for `mode`.
	pub fn spawn<R: Rng + ?Sized>(
		config: &FieldConfig,
		palette: &PalettePolicy,
		mode: ThemeMode,
		rng: &mut R,
	) -> Self {
		let angle = rng.gen_range(0.0..TAU);
		let radius = config.radius.sample(rng);

		let highlight = rng.gen_bool(config.highlight_chance.clamp(0.0, 1.0));
		let size = if highlight {
			config.highlight_size.sample(rng)
		} else {
			config.dust_size.sample(rng)
		};

		// Bigger points drift faster, each with its own jitter.
		let angular_speed = size * config.speed_scale * config.speed_jitter.sample(rng);

		Self {
			angle,
			radius,
			angular_speed,
			size,
			color: palette.sample(mode, rng),
		}
	}

	/// Current angular position (radians, unbounded).
	pub fn angle(&self) -> f64 {
		self.angle
	}

	/// Orbital radius in scene units.
	pub fn radius(&self) -> f64 {
		self.radius
	}

	/// Radians added to `angle` each frame.
	pub fn angular_speed(&self) -> f64 {
		self.angular_speed
	}

	/// Point size in scene units.
	pub fn size(&self) -> f64 {
		self.size
	}

	/// Current fill colour.
	pub fn color(&self) -> Color {
		self.color
	}

	/// Cartesian position on the orbital plane (`z` is always zero).
	pub fn position(&self) -> (f64, f64) {
		let (sin, cos) = self.angle.sin_cos();
		(cos * self.radius, sin * self.radius)
	}

	pub(super) fn advance(&mut self) {
		self.angle += self.angular_speed;
	}

	pub(super) fn set_color(&mut self, color: Color) {
		self.color = color;
	}
}

/// Spawn `count` particles. Zero is valid and yields an empty vector.
pub fn generate<R: Rng + ?Sized>(
	count: usize,
	config: &FieldConfig,
	palette: &PalettePolicy,
	mode: ThemeMode,
	rng: &mut R,
) -> Vec<Particle> {
	(0..count)
		.map(|_| Particle::spawn(config, palette, mode, rng))
		.collect()
}
