//! orbit-field: theme-reactive orbiting particle background.
//!
//! This crate provides a WASM canvas component that draws a slowly rotating
//! field of points behind a page, plus the shared light/dark theme store the
//! component recolours from.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Only needed for its `js` feature, which lets `rand` seed from the browser.
use getrandom as _;

pub mod components;
pub mod theme_store;

pub use components::orbit_field::{ConfigError, FieldConfig, MountError, OrbitBackground};
pub use theme_store::{Subscription, ThemeMode, ThemeStore};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("orbit-field: logging initialized");
}

/// Load field overrides from a script element with id="orbit-config".
/// Any subset of [`FieldConfig`] fields may be given as JSON; a config that
/// fails [`FieldConfig::validate`] is discarded.
fn load_field_config() -> Option<FieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("orbit-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<FieldConfig>(&json_text) {
		Ok(config) => match config.validate() {
			Ok(()) => {
				info!("orbit-field: loaded config ({} particles)", config.count);
				Some(config)
			}
			Err(e) => {
				warn!("orbit-field: rejected config, using defaults: {}", e);
				None
			}
		},
		Err(e) => {
			warn!("orbit-field: failed to parse config, using defaults: {}", e);
			None
		}
	}
}

/// Main application shell.
/// Owns the theme store, renders the background and a theme toggle.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_field_config().unwrap_or_default();
	let theme = ThemeStore::default();
	let mode = RwSignal::new(theme.current());

	// Mirror the store into a signal for the document class and button label.
	let subscription = SendWrapper::new(theme.subscribe(move |m| mode.set(m)));
	on_cleanup(move || drop(subscription.take()));

	let toggle = theme.clone();

	view! {
		<Html
			attr:lang="en"
			attr:dir="ltr"
			attr:class=move || mode.get().as_str()
			attr:data-theme=move || mode.get().as_str()
		/>
		<Title text="Portfolio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<OrbitBackground theme=theme config=config />
		<button
			class="theme-toggle"
			aria-label="Toggle light and dark theme"
			on:click=move |_| toggle.toggle()
		>
			{move || match mode.get() {
				ThemeMode::Light => "Dark mode",
				ThemeMode::Dark => "Light mode",
			}}
		</button>
	}
}
