//! Theme-dependent colouring for the orbit field.
//!
//! Particles take their colour from an HSL band chosen by the active
//! [`ThemeMode`]; the container behind the canvas paints a static gradient per
//! mode, which doubles as the fallback when the canvas cannot be used.

use std::fmt::{self, Write};

use rand::Rng;
use serde::Deserialize;

use super::config::Span;
use crate::theme_store::ThemeMode;

/// RGB colour with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
	/// Red.
	pub r: f64,
	/// Green.
	pub g: f64,
	/// Blue.
	pub b: f64,
}

impl Color {
	/// Colour from raw channels.
	pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
		Self { r, g, b }
	}

	/// Convert hue (degrees), saturation and lightness (both `[0, 1]`) to RGB.
	pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
		let h = hue.rem_euclid(360.0) / 60.0;
		let s = saturation.clamp(0.0, 1.0);
		let l = lightness.clamp(0.0, 1.0);

		let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
		let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
		let m = l - chroma / 2.0;

		let (r, g, b) = match h as u32 {
			0 => (chroma, x, 0.0),
			1 => (x, chroma, 0.0),
			2 => (0.0, chroma, x),
			3 => (0.0, x, chroma),
			4 => (x, 0.0, chroma),
			_ => (chroma, 0.0, x),
		};

		Self {
			r: (r + m).clamp(0.0, 1.0),
			g: (g + m).clamp(0.0, 1.0),
			b: (b + m).clamp(0.0, 1.0),
		}
	}

	/// `#rrggbb` hex string.
	pub fn to_css(self) -> String {
		let mut css = String::with_capacity(7);
		// Writing into a String cannot fail.
		let _ = self.write_css(&mut css);
		css
	}

	/// Overwrite `out` with the `#rrggbb` form, reusing its allocation.
	pub fn write_css(self, out: &mut String) -> fmt::Result {
		let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
		out.clear();
		write!(
			out,
			"#{:02x}{:02x}{:02x}",
			channel(self.r),
			channel(self.g),
			channel(self.b)
		)
	}
}

/// HSL distribution for one theme. Hue in degrees, saturation and lightness
/// as fractions.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HslBand {
	/// Hue range in degrees.
	pub hue: Span,
	/// Saturation range.
	pub saturation: Span,
	/// Lightness range.
	pub lightness: Span,
}

impl HslBand {
	/// Draw one colour from the band.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
		let hue = self.hue.sample(rng);
		let saturation = self.saturation.sample(rng);
		let lightness = self.lightness.sample(rng);
		Color::from_hsl(hue, saturation, lightness)
	}
}

/// Per-theme particle colour policy.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PalettePolicy {
	/// Narrow teal band, skewed bright.
	pub light: HslBand,
	/// Single blue hue over a wide lightness range.
	pub dark: HslBand,
}

impl PalettePolicy {
	/// The band used while `mode` is active.
	pub fn band(&self, mode: ThemeMode) -> &HslBand {
		match mode {
			ThemeMode::Light => &self.light,
			ThemeMode::Dark => &self.dark,
		}
	}

	/// Draw one particle colour for `mode`.
	pub fn sample<R: Rng + ?Sized>(&self, mode: ThemeMode, rng: &mut R) -> Color {
		self.band(mode).sample(rng)
	}
}

impl Default for PalettePolicy {
	fn default() -> Self {
		Self {
			light: HslBand {
				hue: Span::new(170.0, 185.0),
				saturation: Span::new(0.85, 0.85),
				lightness: Span::new(0.55, 0.85),
			},
			dark: HslBand {
				hue: Span::new(210.0, 210.0),
				saturation: Span::new(0.80, 0.80),
				lightness: Span::new(0.05, 0.65),
			},
		}
	}
}

/// CSS background painted behind the canvas for `mode`.
pub fn backdrop_gradient(mode: ThemeMode) -> &'static str {
	match mode {
		ThemeMode::Light => "linear-gradient(to bottom, #f1f5f9, #e2e8f0 40%, #d9e2ec 100%)",
		ThemeMode::Dark => "linear-gradient(to bottom, #1e242b, #0f1214 40%, #0c0d0d 100%)",
	}
}

/// Inline style for the fixed full-viewport container.
pub fn container_style(mode: ThemeMode) -> String {
	format!(
		"position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
		 pointer-events: none; z-index: -1; transition: background 0.7s; background: {};",
		backdrop_gradient(mode)
	)
}
