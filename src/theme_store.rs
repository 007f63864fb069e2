//! Process-wide light/dark theme state.
//!
//! [`ThemeStore`] is a cheap-to-clone handle around a single shared value.
//! Components that follow the theme call [`ThemeStore::subscribe`] when they
//! mount and keep the returned [`Subscription`] until they unmount; dropping it
//! removes the callback.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use log::debug;

/// The site's visual mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThemeMode {
	/// Pale backdrop, bright teal particles.
	Light,
	/// Near-black backdrop, dim blue particles.
	#[default]
	Dark,
}

impl ThemeMode {
	/// The opposite mode.
	pub fn toggled(self) -> Self {
		match self {
			ThemeMode::Light => ThemeMode::Dark,
			ThemeMode::Dark => ThemeMode::Light,
		}
	}

	/// Lowercase name, also used as the document class.
	pub fn as_str(self) -> &'static str {
		match self {
			ThemeMode::Light => "light",
			ThemeMode::Dark => "dark",
		}
	}
}

impl fmt::Display for ThemeMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

type Listener = Rc<dyn Fn(ThemeMode)>;

struct StoreInner {
	mode: ThemeMode,
	next_id: u64,
	listeners: Vec<(u64, Listener)>,
}

/// Shared, observable theme value.
///
/// Every clone refers to the same value, so all subscribers observe the same
/// mode. Only [`toggle`](Self::toggle) and [`set`](Self::set) write it.
#[derive(Clone)]
pub struct ThemeStore {
	inner: Rc<RefCell<StoreInner>>,
}

impl ThemeStore {
	/// Create a store holding `mode`, with no subscribers.
	pub fn new(mode: ThemeMode) -> Self {
		Self {
			inner: Rc::new(RefCell::new(StoreInner {
				mode,
				next_id: 0,
				listeners: Vec::new(),
			})),
		}
	}

	/// The active mode.
	pub fn current(&self) -> ThemeMode {
		self.inner.borrow().mode
	}

	/// Flip light/dark. Every call flips; callers debounce if they need to.
	pub fn toggle(&self) {
		let next = self.current().toggled();
		self.set(next);
	}

	/// Replace the mode, notifying subscribers only if it changed.
	///
	/// A listener whose subscription is dropped by an earlier listener during
	/// the same notification is skipped.
	pub fn set(&self, mode: ThemeMode) {
		let listeners: Vec<(u64, Listener)> = {
			let mut inner = self.inner.borrow_mut();
			if inner.mode == mode {
				return;
			}
			inner.mode = mode;
			inner.listeners.clone()
		};
		debug!(
			"orbit-field: theme -> {} ({} subscribers)",
			mode,
			listeners.len()
		);
		// Borrow released above so listeners may read or write the store.
		for (id, listener) in listeners {
			if self.is_subscribed(id) {
				listener(mode);
			}
		}
	}

	fn is_subscribed(&self, id: u64) -> bool {
		self.inner.borrow().listeners.iter().any(|(l, _)| *l == id)
	}

	/// Register `listener` to run after every change. The listener stays
	/// registered until the returned guard is dropped.
	#[must_use = "dropping the subscription unsubscribes immediately"]
	pub fn subscribe(&self, listener: impl Fn(ThemeMode) + 'static) -> Subscription {
		let mut inner = self.inner.borrow_mut();
		let id = inner.next_id;
		inner.next_id += 1;
		inner.listeners.push((id, Rc::new(listener)));
		Subscription {
			id,
			store: Rc::downgrade(&self.inner),
		}
	}

	/// Number of live subscriptions.
	pub fn subscriber_count(&self) -> usize {
		self.inner.borrow().listeners.len()
	}
}

impl Default for ThemeStore {
	fn default() -> Self {
		Self::new(ThemeMode::default())
	}
}

impl fmt::Debug for ThemeStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let inner = self.inner.borrow();
		f.debug_struct("ThemeStore")
			.field("mode", &inner.mode)
			.field("subscribers", &inner.listeners.len())
			.finish()
	}
}

/// Guard for one registered listener. Released exactly once, on drop.
pub struct Subscription {
	id: u64,
	store: Weak<RefCell<StoreInner>>,
}

impl Subscription {
	/// Release the listener now rather than at end of scope.
	pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		// Store may already be gone at app teardown.
		if let Some(inner) = self.store.upgrade() {
			inner.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
		}
	}
}
