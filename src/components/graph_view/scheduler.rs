//! Frame scheduling and the force simulation loop.
//!
//! [`FrameScheduler`] is the only source of asynchrony in the view: a deferred
//! call plus a cancel handle. [`WindowScheduler`] backs it with `setTimeout`
//! in the browser; [`ManualScheduler`] queues tasks until the caller runs
//! them, which makes the loop fully deterministic headless.
//!
//! [`SimulationScheduler`] is the `Idle → Stepping → (Idle | Stepping)` state
//! machine. At most one tick chain exists at any time: every start and every
//! cancel bumps a generation counter and cancels the pending tick, and a tick
//! that fires for an old generation does nothing.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use log::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Delay between animated simulation ticks (one frame).
pub const FRAME_DELAY: Duration = Duration::from_millis(16);

/// Handle identifying a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Deferred execution on the host event loop.
///
/// Implementations must never run `task` synchronously inside
/// `schedule_after`; callers hold state borrows across the call.
pub trait FrameScheduler {
	/// Run `task` once after `delay`. `None` means the task was dropped and
	/// will never run.
	fn schedule_after(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Option<TimerHandle>;
	/// Cancel a pending task. Unknown or already-run handles are ignored.
	fn cancel(&self, handle: TimerHandle);
}

/// Scheduler that only runs tasks when asked to.
#[derive(Default)]
pub struct ManualScheduler {
	queue: RefCell<VecDeque<(TimerHandle, Duration, Box<dyn FnOnce()>)>>,
	next_id: Cell<u64>,
}

impl ManualScheduler {
	/// Empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of queued tasks.
	pub fn pending(&self) -> usize {
		self.queue.borrow().len()
	}

	/// Delay requested by the oldest pending task.
	pub fn next_delay(&self) -> Option<Duration> {
		self.queue.borrow().front().map(|(_, delay, _)| *delay)
	}

	/// Run the oldest pending task. Returns `false` when nothing was pending.
	pub fn run_next(&self) -> bool {
		// Release the queue before running so the task may schedule again.
		let next = self.queue.borrow_mut().pop_front();
		match next {
			Some((_, _, task)) => {
				task();
				true
			}
			None => false,
		}
	}

	/// Run tasks, including ones scheduled while running, up to `limit`.
	/// Returns how many ran.
	pub fn run_until_idle(&self, limit: usize) -> usize {
		let mut ran = 0;
		while ran < limit && self.run_next() {
			ran += 1;
		}
		ran
	}
}

impl FrameScheduler for ManualScheduler {
	fn schedule_after(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Option<TimerHandle> {
		let id = self.next_id.get() + 1;
		self.next_id.set(id);
		let handle = TimerHandle(id);
		self.queue.borrow_mut().push_back((handle, delay, task));
		Some(handle)
	}

	fn cancel(&self, handle: TimerHandle) {
		self.queue.borrow_mut().retain(|(h, _, _)| *h != handle);
	}
}

/// `setTimeout`-backed scheduler for the browser.
///
/// Callbacks stay owned here until they fire or are cancelled, so a
/// cancelled timer releases its task.
#[derive(Default)]
pub struct WindowScheduler {
	pending: Rc<RefCell<HashMap<u64, Closure<dyn FnMut()>>>>,
	fired: Rc<RefCell<Vec<u64>>>,
}

impl WindowScheduler {
	/// Scheduler with no timers.
	pub fn new() -> Self {
		Self::default()
	}

	// A closure can't be dropped while it runs, so fired ones are
	// released on the next call instead.
	fn purge_fired(&self) {
		let fired: Vec<u64> = self.fired.borrow_mut().drain(..).collect();
		if fired.is_empty() {
			return;
		}
		let mut pending = self.pending.borrow_mut();
		for id in fired {
			pending.remove(&id);
		}
	}
}

impl FrameScheduler for WindowScheduler {
	fn schedule_after(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Option<TimerHandle> {
		self.purge_fired();
		let Some(window) = web_sys::window() else {
			warn!("graph-view: no window, dropping scheduled task");
			return None;
		};
		let slot = Rc::new(Cell::new(0u64));
		let fired = Rc::clone(&self.fired);
		let own_id = Rc::clone(&slot);
		let mut task = Some(task);
		let callback = Closure::<dyn FnMut()>::new(move || {
			if let Some(task) = task.take() {
				task();
			}
			fired.borrow_mut().push(own_id.get());
		});
		match window.set_timeout_with_callback_and_timeout_and_arguments_0(
			callback.as_ref().unchecked_ref(),
			delay.as_millis() as i32,
		) {
			Ok(id) => {
				let id = id as u32 as u64;
				slot.set(id);
				self.pending.borrow_mut().insert(id, callback);
				Some(TimerHandle(id))
			}
			Err(e) => {
				warn!("graph-view: setTimeout failed: {:?}", e);
				None
			}
		}
	}

	fn cancel(&self, handle: TimerHandle) {
		self.purge_fired();
		if let Some(window) = web_sys::window() {
			window.clear_timeout_with_handle(handle.0 as u32 as i32);
		}
		self.pending.borrow_mut().remove(&handle.0);
	}
}

/// Simulation loop state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimState {
	/// No tick is running or pending.
	#[default]
	Idle,
	/// Ticks are running.
	Stepping,
}

#[derive(Debug, Default)]
struct LoopState {
	state: SimState,
	pending: Option<TimerHandle>,
	generation: u64,
	ticks: u64,
}

/// Drives a step function until it reports convergence.
///
/// The step function advances the simulation, re-synchronizes rendering and
/// returns `true` once the simulation has stopped.
#[derive(Clone)]
pub struct SimulationScheduler {
	frames: Rc<dyn FrameScheduler>,
	inner: Rc<RefCell<LoopState>>,
}

impl SimulationScheduler {
	/// Loop driven by `frames`.
	pub fn new(frames: Rc<dyn FrameScheduler>) -> Self {
		Self {
			frames,
			inner: Rc::new(RefCell::new(LoopState::default())),
		}
	}

	/// Current loop state.
	pub fn state(&self) -> SimState {
		self.inner.borrow().state
	}

	/// Whether the loop is stepping.
	pub fn is_running(&self) -> bool {
		self.state() == SimState::Stepping
	}

	/// Ticks completed since creation.
	pub fn ticks(&self) -> u64 {
		self.inner.borrow().ticks
	}

	/// Whether a deferred tick is waiting on the frame scheduler.
	pub fn has_pending(&self) -> bool {
		self.inner.borrow().pending.is_some()
	}

	/// Cancel any pending tick and return to `Idle`.
	pub fn cancel(&self) {
		let mut s = self.inner.borrow_mut();
		if let Some(handle) = s.pending.take() {
			self.frames.cancel(handle);
		}
		if s.state == SimState::Stepping {
			debug!("graph-view: simulation cancelled after {} ticks", s.ticks);
		}
		s.generation += 1;
		s.state = SimState::Idle;
	}

	/// (Re)start the loop. The first tick runs immediately; later ones are
	/// deferred by [`FRAME_DELAY`] when `animated`, or run back-to-back.
	pub fn start(&self, animated: bool, step: Rc<dyn Fn() -> bool>) {
		self.cancel();
		let generation = {
			let mut s = self.inner.borrow_mut();
			s.state = SimState::Stepping;
			s.generation
		};
		debug!("graph-view: simulation started (animated: {})", animated);
		Self::run(self.frames.clone(), self.inner.clone(), generation, animated, step);
	}

	fn run(
		frames: Rc<dyn FrameScheduler>,
		inner: Rc<RefCell<LoopState>>,
		generation: u64,
		animated: bool,
		step: Rc<dyn Fn() -> bool>,
	) {
		loop {
			{
				let mut s = inner.borrow_mut();
				if s.generation != generation {
					return;
				}
				s.pending = None;
			}

			let stopped = step();

			let mut s = inner.borrow_mut();
			// The step may have restarted or cancelled the loop.
			if s.generation != generation {
				return;
			}
			s.ticks += 1;
			if stopped {
				s.state = SimState::Idle;
				debug!("graph-view: simulation converged after {} ticks", s.ticks);
				return;
			}
			if animated {
				let (frames_next, inner_next) = (frames.clone(), inner.clone());
				let task = Box::new(move || {
					Self::run(frames_next, inner_next, generation, animated, step);
				});
				match frames.schedule_after(FRAME_DELAY, task) {
					Some(handle) => {
						s.pending = Some(handle);
						trace!("graph-view: tick {} scheduled", s.ticks + 1);
					}
					None => {
						s.state = SimState::Idle;
						warn!("graph-view: could not schedule tick {}, simulation stopped", s.ticks + 1);
					}
				}
				return;
			}
		}
	}
}
