//! Tunable parameters for the orbit field.
//!
//! The config structs derive `Deserialize` with `#[serde(default)]`, so a page
//! can override any subset of fields through the `orbit-config` script element
//! and inherit the rest from [`Default`].

use log::warn;
use rand::Rng;
use serde::Deserialize;

use super::error::ConfigError;
use super::theme::{HslBand, PalettePolicy};

/// Half-open interval `[min, max)` sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Span {
	/// Inclusive lower bound.
	pub min: f64,
	/// Exclusive upper bound.
	pub max: f64,
}

impl Span {
	/// `[min, max)`.
	pub const fn new(min: f64, max: f64) -> Self {
		Self { min, max }
	}

	/// Uniform draw from `[min, max)`. Degenerate or inverted spans yield `min`.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
		if self.max > self.min {
			rng.gen_range(self.min..self.max)
		} else {
			self.min
		}
	}

	/// Whether `value` lies inside `[min, max)`.
	pub fn contains(&self, value: f64) -> bool {
		value >= self.min && value < self.max
	}

	/// Whether [`sample`](Self::sample) can draw from this span without
	/// panicking: finite bounds and a finite width.
	pub fn is_sampleable(&self) -> bool {
		self.min.is_finite() && self.max.is_finite() && (self.max - self.min).is_finite()
	}
}

fn check_span(name: &'static str, span: &Span) -> Result<(), ConfigError> {
	if span.is_sampleable() {
		Ok(())
	} else {
		Err(ConfigError::BadSpan(name))
	}
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
	if value.is_finite() {
		Ok(())
	} else {
		Err(ConfigError::NotFinite(name))
	}
}

fn check_band(prefix: [&'static str; 3], band: &HslBand) -> Result<(), ConfigError> {
	check_span(prefix[0], &band.hue)?;
	check_span(prefix[1], &band.saturation)?;
	check_span(prefix[2], &band.lightness)
}

/// Perspective camera looking down -z at the orbital plane.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
	/// Vertical field of view in degrees.
	pub fov_degrees: f64,
	/// Near clip plane distance.
	pub near: f64,
	/// Far clip plane distance.
	pub far: f64,
	/// Eye distance from the orbital plane (scene units).
	pub distance: f64,
	/// Point sprite attenuation: on-screen diameter is `size * point_scale / depth`.
	pub point_scale: f64,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			fov_degrees: 45.0,
			near: 1.0,
			far: 2000.0,
			distance: 500.0,
			point_scale: 300.0,
		}
	}
}

/// Complete configuration for one particle field.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
	/// Number of particles. Fixed for the life of a mounted field.
	pub count: usize,
	/// Orbital radius range. Keep `min` above zero or points pile up at the centre.
	pub radius: Span,
	/// Size range for the common "dust" points. Should end where
	/// `highlight_size` starts so the tiers stay distinguishable.
	pub dust_size: Span,
	/// Size range for the rare highlight points.
	pub highlight_size: Span,
	/// Probability that a particle is a highlight.
	pub highlight_chance: f64,
	/// Angular speed per unit of size (radians per frame).
	pub speed_scale: f64,
	/// Per-particle multiplier applied on top of `size * speed_scale`.
	pub speed_jitter: Span,
	/// Per-theme particle colours.
	pub palette: PalettePolicy,
	/// Projection parameters.
	pub camera: CameraConfig,
}

impl FieldConfig {
	/// Reject values that would put particles at the centre, make sampling
	/// panic, or break the projection. Config read from the page goes through
	/// this before use.
	pub fn validate(&self) -> Result<(), ConfigError> {
		check_span("radius", &self.radius)?;
		if self.radius.min <= 0.0 {
			return Err(ConfigError::NonPositiveRadius(self.radius.min));
		}
		check_span("dust_size", &self.dust_size)?;
		check_span("highlight_size", &self.highlight_size)?;
		check_span("speed_jitter", &self.speed_jitter)?;
		check_finite("highlight_chance", self.highlight_chance)?;
		check_finite("speed_scale", self.speed_scale)?;
		check_band(
			["palette.light.hue", "palette.light.saturation", "palette.light.lightness"],
			&self.palette.light,
		)?;
		check_band(
			["palette.dark.hue", "palette.dark.saturation", "palette.dark.lightness"],
			&self.palette.dark,
		)?;

		let camera = &self.camera;
		check_finite("camera.fov_degrees", camera.fov_degrees)?;
		check_finite("camera.distance", camera.distance)?;
		check_finite("camera.point_scale", camera.point_scale)?;
		check_finite("camera.near", camera.near)?;
		check_finite("camera.far", camera.far)?;
		if camera.near <= 0.0 || camera.near >= camera.far {
			return Err(ConfigError::ClipPlanes {
				near: camera.near,
				far: camera.far,
			});
		}
		Ok(())
	}

	/// `self` if it passes [`validate`](Self::validate), otherwise the
	/// defaults, with a warning.
	pub fn or_default_if_invalid(self) -> Self {
		match self.validate() {
			Ok(()) => self,
			Err(e) => {
				warn!("orbit-field: rejected config ({}), using defaults", e);
				Self::default()
			}
		}
	}
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			count: 500,
			radius: Span::new(30.0, 530.0),
			dust_size: Span::new(0.5, 5.0),
			highlight_size: Span::new(5.0, 20.0),
			highlight_chance: 0.01,
			speed_scale: 0.25,
			speed_jitter: Span::new(0.0001, 0.0006),
			palette: PalettePolicy::default(),
			camera: CameraConfig::default(),
		}
	}
}
