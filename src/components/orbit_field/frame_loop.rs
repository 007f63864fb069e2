//! Cancellable bookkeeping for the per-frame callback.
//!
//! The browser hands out an integer id for every `requestAnimationFrame`
//! request. [`FrameLoop`] remembers the pending id and a generation counter:
//! each frame callback carries the [`Generation`] it was started with, and
//! [`FrameLoop::stop`] bumps the counter so any callback that still fires
//! afterwards sees a stale generation and does nothing.

/// Identifies one run of the loop, from `start` to `stop`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Generation(u32);

/// Scheduling state for one mounted field.
#[derive(Debug, Default)]
pub struct FrameLoop {
	generation: u32,
	running: bool,
	pending: Option<i32>,
	frames: u64,
}

impl FrameLoop {
	/// A stopped loop at generation zero.
	pub fn new() -> Self {
		Self::default()
	}

	/// Begin a new run. Any earlier run is invalidated.
	pub fn start(&mut self) -> Generation {
		self.generation = self.generation.wrapping_add(1);
		self.running = true;
		self.pending = None;
		Generation(self.generation)
	}

	/// Whether a run is in progress.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Whether a callback tagged with `generation` should still do work.
	pub fn is_current(&self, generation: Generation) -> bool {
		self.running && generation.0 == self.generation
	}

	/// Record the id of the request that will deliver the next frame.
	pub fn schedule(&mut self, request_id: i32) {
		if self.running {
			self.pending = Some(request_id);
		}
	}

	/// Called at the top of each frame callback. Returns `false` for stale
	/// callbacks, which must then neither update nor reschedule.
	pub fn begin_frame(&mut self, generation: Generation) -> bool {
		if !self.is_current(generation) {
			return false;
		}
		self.pending = None;
		self.frames += 1;
		true
	}

	/// End the run. Returns the pending request id to cancel, at most once:
	/// later calls return `None`.
	pub fn stop(&mut self) -> Option<i32> {
		if !self.running {
			return None;
		}
		self.running = false;
		self.generation = self.generation.wrapping_add(1);
		self.pending.take()
	}

	/// Frames delivered across all runs.
	pub fn frames(&self) -> u64 {
		self.frames
	}
}
