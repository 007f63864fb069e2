//! Leptos component wrapping the orbit field canvas.
//!
//! The component renders a fixed full-viewport container painted with the
//! theme gradient and a transparent canvas on top. Once the canvas exists, an
//! effect builds the [`OrbitScene`], subscribes it to theme changes, listens
//! for window resizes and starts a `requestAnimationFrame` loop. Unmounting
//! releases all of that through [`Mounted::teardown`]; a failed mount releases
//! whatever was acquired and leaves the static gradient showing.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::config::FieldConfig;
use super::error::MountError;
use super::render;
use super::state::OrbitScene;
use super::theme::container_style;
use crate::theme_store::{Subscription, ThemeStore};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// The scene and its theme subscription. Holds no browser handles.
struct SceneBinding {
	scene: Rc<RefCell<OrbitScene>>,
	subscription: Option<Subscription>,
}

impl SceneBinding {
	/// Share `scene` and recolour it on every theme change.
	fn new(scene: OrbitScene, theme: &ThemeStore) -> Self {
		let scene = Rc::new(RefCell::new(scene));
		let scene_theme = scene.clone();
		let subscription = theme.subscribe(move |mode| {
			if scene_theme
				.borrow_mut()
				.set_theme(mode, &mut rand::thread_rng())
			{
				debug!("orbit-field: recolored for {} theme", mode);
			}
		});
		Self {
			scene,
			subscription: Some(subscription),
		}
	}

	/// Stop the loop and drop the theme subscription. Returns the pending
	/// frame request to cancel, at most once.
	fn release(&mut self) -> Option<i32> {
		let pending = self.scene.borrow_mut().frame_loop.stop();
		self.subscription.take();
		pending
	}
}

/// Browser-side resources held by one mounted field.
struct Mounted {
	window: Window,
	binding: SceneBinding,
	animate: FrameCallback,
	resize_cb: Option<Closure<dyn FnMut()>>,
}

impl Mounted {
	/// Cancel the pending frame, remove the resize listener, drop the theme
	/// subscription and free the frame closure.
	fn teardown(self) {
		let Mounted {
			window,
			mut binding,
			animate,
			resize_cb,
		} = self;

		if let Some(id) = binding.release() {
			let _ = window.cancel_animation_frame(id);
		}
		if let Some(cb) = resize_cb {
			let _ =
				window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		// The frame closure holds a handle to its own cell.
		animate.borrow_mut().take();

		debug!(
			"orbit-field: unmounted after {} frames",
			binding.scene.borrow().frame_loop.frames()
		);
	}
}

/// Current window size in CSS pixels. Missing values fall back to 1.
fn viewport(window: &Window) -> (f64, f64) {
	let dimension =
		|value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
	(
		dimension(window.inner_width()),
		dimension(window.inner_height()),
	)
}

fn mount(
	canvas: HtmlCanvasElement,
	theme: &ThemeStore,
	config: &FieldConfig,
) -> Result<Mounted, MountError> {
	let window = web_sys::window().ok_or(MountError::NoWindow)?;
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(|e| MountError::js(MountError::Context, e))?
		.ok_or(MountError::NoContext)?
		.dyn_into()
		.map_err(|_| MountError::NoContext)?;

	let (w, h) = viewport(&window);
	let scene = OrbitScene::new(config, theme.current(), w, h, &mut rand::thread_rng());
	canvas.set_width(scene.camera.width());
	canvas.set_height(scene.camera.height());
	info!(
		"orbit-field: mounted {} particles at {}x{} ({} theme)",
		scene.field.len(),
		scene.camera.width(),
		scene.camera.height(),
		scene.mode()
	);

	let mut mounted = Mounted {
		window,
		binding: SceneBinding::new(scene, theme),
		animate: Rc::default(),
		resize_cb: None,
	};
	match attach(&mut mounted, canvas, ctx) {
		Ok(()) => Ok(mounted),
		Err(e) => {
			mounted.teardown();
			Err(e)
		}
	}
}

/// Wire the scene to window resizes and the frame loop.
fn attach(
	mounted: &mut Mounted,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
) -> Result<(), MountError> {
	let scene = mounted.binding.scene.clone();
	let generation = scene.borrow_mut().frame_loop.start();

	let scene_resize = scene.clone();
	let resize_cb: Closure<dyn FnMut()> = Closure::new(move || {
		let Some(win) = web_sys::window() else {
			return;
		};
		let (w, h) = viewport(&win);
		if let Some((pw, ph)) = scene_resize.borrow_mut().resize(w, h) {
			canvas.set_width(pw);
			canvas.set_height(ph);
		}
	});
	let registered = mounted
		.window
		.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
	mounted.resize_cb = Some(resize_cb);
	registered.map_err(|e| MountError::js(MountError::Listener, e))?;

	let (scene_anim, animate_inner) = (scene.clone(), mounted.animate.clone());
	*mounted.animate.borrow_mut() = Some(Closure::new(move || {
		{
			let mut scene = scene_anim.borrow_mut();
			if !scene.frame(generation) {
				return;
			}
			render::render(&scene, &ctx);
		}
		let Some(win) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *animate_inner.borrow() {
			match win.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => scene_anim.borrow_mut().frame_loop.schedule(id),
				Err(e) => {
					warn!(
						"orbit-field: {}; animation stopped",
						MountError::js(MountError::FrameRequest, e)
					);
					scene_anim.borrow_mut().frame_loop.stop();
				}
			}
		}
	}));

	let request = {
		let animate = mounted.animate.borrow();
		let Some(cb) = animate.as_ref() else {
			return Ok(());
		};
		mounted
			.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
	};
	let id = request.map_err(|e| MountError::js(MountError::FrameRequest, e))?;
	scene.borrow_mut().frame_loop.schedule(id);
	Ok(())
}

/// Animated particle background that follows the shared theme.
///
/// Fills the viewport behind the page (`position: fixed`, `z-index: -1`) and
/// ignores pointer events. If the canvas cannot be driven, only the static
/// theme gradient is shown.
#[component]
pub fn OrbitBackground(
	/// Shared theme; the field recolours whenever it changes.
	theme: ThemeStore,
	/// Field parameters. Defaults to [`FieldConfig::default`].
	#[prop(optional)]
	config: Option<FieldConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mode = RwSignal::new(theme.current());
	let degraded = RwSignal::new(false);
	let config = config
		.map(FieldConfig::or_default_if_invalid)
		.unwrap_or_default();

	// The gradient tracks the theme even when the canvas never comes up.
	let backdrop_sub = theme.subscribe(move |m| mode.set(m));

	let mounted: Rc<RefCell<Option<Mounted>>> = Rc::default();
	let mounted_init = mounted.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(previous) = mounted_init.borrow_mut().take() {
			previous.teardown();
		}
		match mount(canvas, &theme, &config) {
			Ok(m) => {
				degraded.set(false);
				*mounted_init.borrow_mut() = Some(m);
			}
			Err(e) => {
				warn!("orbit-field: showing static backdrop: {}", e);
				degraded.set(true);
			}
		}
	});

	let held = SendWrapper::new((mounted, backdrop_sub));
	on_cleanup(move || {
		let (mounted, backdrop_sub) = held.take();
		if let Some(m) = mounted.borrow_mut().take() {
			m.teardown();
		}
		drop(backdrop_sub);
	});

	view! {
		<div
			class="orbit-background"
			aria-hidden="true"
			style=move || container_style(mode.get())
		>
			<canvas
				node_ref=canvas_ref
				class="orbit-background-canvas"
				style=move || {
					if degraded.get() {
						"display: none;"
					} else {
						"display: block; width: 100%; height: 100%;"
					}
				}
			/>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::theme_store::ThemeMode;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn binding(theme: &ThemeStore) -> SceneBinding {
		let config = FieldConfig {
			count: 8,
			..FieldConfig::default()
		};
		let scene = OrbitScene::new(
			&config,
			theme.current(),
			800.0,
			600.0,
			&mut StdRng::seed_from_u64(21),
		);
		SceneBinding::new(scene, theme)
	}

	#[test]
	fn binding_recolors_on_theme_change() {
		let theme = ThemeStore::new(ThemeMode::Light);
		let binding = binding(&theme);
		assert_eq!(theme.subscriber_count(), 1);

		theme.toggle();
		assert_eq!(binding.scene.borrow().mode(), ThemeMode::Dark);
	}

	#[test]
	fn release_cancels_once_and_unsubscribes() {
		let theme = ThemeStore::new(ThemeMode::Light);
		let mut binding = binding(&theme);
		let generation = binding.scene.borrow_mut().frame_loop.start();
		binding.scene.borrow_mut().frame_loop.schedule(42);

		assert_eq!(binding.release(), Some(42));
		assert_eq!(binding.release(), None);
		assert_eq!(theme.subscriber_count(), 0);

		let colors = binding.scene.borrow().field.css_colors().to_vec();
		theme.toggle();
		let scene = binding.scene.borrow();
		assert_eq!(scene.mode(), ThemeMode::Light);
		assert_eq!(scene.field.css_colors(), colors.as_slice());
		drop(scene);
		assert!(!binding.scene.borrow_mut().frame(generation));
	}

	#[test]
	fn dropping_binding_unsubscribes() {
		let theme = ThemeStore::new(ThemeMode::Dark);
		drop(binding(&theme));
		assert_eq!(theme.subscriber_count(), 0);
	}
}
