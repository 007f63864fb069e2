//! Animated orbiting-particle background.
//!
//! Renders a field of points circling the viewport centre on an HTML canvas:
//! - Particles spawned with random radius, angle and a rare large "highlight" tier
//! - Constant angular drift, faster for larger points
//! - Colours drawn from a per-theme HSL band, redrawn whenever the theme flips
//! - Perspective projection kept in sync with the window size
//! - Static gradient fallback when the canvas cannot be used
//!
//! # Example
//!
//! ```ignore
//! use orbit_field::{OrbitBackground, ThemeMode, ThemeStore};
//!
//! let theme = ThemeStore::new(ThemeMode::Dark);
//! view! { <OrbitBackground theme=theme.clone() /> }
//! // later, from a button handler:
//! theme.toggle();
//! ```

pub mod camera;
mod component;
pub mod config;
mod error;
pub mod frame_loop;
pub mod particles;
mod render;
pub mod state;
pub mod theme;

pub use component::OrbitBackground;
pub use config::{CameraConfig, FieldConfig, Span};
pub use error::{ConfigError, MountError};
pub use state::{OrbitField, OrbitScene};
pub use theme::{Color, HslBand, PalettePolicy};
