//! Reasons the animated background could not start.
//!
//! None of these are fatal to the page: the component logs the error and
//! keeps showing the static gradient. A rejected [`ConfigError`] falls back
//! to the default field instead.

use std::fmt;

use wasm_bindgen::JsValue;

/// Errors that can occur while mounting the animated field.
#[derive(Debug)]
pub enum MountError {
	/// No global `window` (not running in a browser).
	NoWindow,
	/// `getContext("2d")` threw.
	Context(String),
	/// The canvas returned no 2D context.
	NoContext,
	/// `requestAnimationFrame` refused the callback.
	FrameRequest(String),
	/// Registering the resize listener failed.
	Listener(String),
}

impl MountError {
	pub(crate) fn js(kind: fn(String) -> Self, value: JsValue) -> Self {
		kind(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
	}
}

impl fmt::Display for MountError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MountError::NoWindow => write!(f, "no browser window available"),
			MountError::Context(msg) => write!(f, "failed to acquire canvas context: {}", msg),
			MountError::NoContext => write!(f, "canvas has no 2d rendering context"),
			MountError::FrameRequest(msg) => write!(f, "failed to schedule animation frame: {}", msg),
			MountError::Listener(msg) => write!(f, "failed to register resize listener: {}", msg),
		}
	}
}

impl std::error::Error for MountError {}

/// A [`FieldConfig`](super::FieldConfig) that would spawn degenerate particles
/// or panic while sampling.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
	/// The named value is NaN or infinite.
	NotFinite(&'static str),
	/// The named range is NaN, infinite, or too wide to sample.
	BadSpan(&'static str),
	/// Orbital radii must stay above zero.
	NonPositiveRadius(f64),
	/// Camera near plane must be positive and in front of the far plane.
	ClipPlanes {
		/// Configured near plane.
		near: f64,
		/// Configured far plane.
		far: f64,
	},
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::NotFinite(name) => write!(f, "{} must be finite", name),
			ConfigError::BadSpan(name) => write!(f, "{} range is not sampleable", name),
			ConfigError::NonPositiveRadius(min) => {
				write!(f, "radius.min must be above zero, got {}", min)
			}
			ConfigError::ClipPlanes { near, far } => {
				write!(f, "camera clip planes invalid: near {} far {}", near, far)
			}
		}
	}
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_messages() {
		assert_eq!(MountError::NoWindow.to_string(), "no browser window available");
		assert_eq!(
			MountError::FrameRequest("busy".into()).to_string(),
			"failed to schedule animation frame: busy"
		);
		assert_eq!(
			ConfigError::NonPositiveRadius(0.0).to_string(),
			"radius.min must be above zero, got 0"
		);
	}
}
