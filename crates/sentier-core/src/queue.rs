//! Subscriber notification queue.
//!
//! Every `set` on a store pushes one job per subscriber onto a thread-local
//! queue. The outermost `set` drains the queue; `set` calls made while a
//! drain is in progress only append, so cascades are processed breadth-first
//! instead of recursing.

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// A pending subscriber notification.
pub(crate) type Job = Box<dyn FnOnce()>;

thread_local! {
	static QUEUE: RefCell<VecDeque<Job>> = const { RefCell::new(VecDeque::new()) };
	static DRAINING: Cell<bool> = const { Cell::new(false) };
}

/// Returns `true` when no drain is running and nothing is queued.
///
/// The caller that observes an idle queue before pushing is responsible for
/// draining it.
pub(crate) fn is_idle() -> bool {
	!DRAINING.with(Cell::get) && QUEUE.with(|queue| queue.borrow().is_empty())
}

pub(crate) fn push(job: Job) {
	QUEUE.with(|queue| queue.borrow_mut().push_back(job));
}

/// Runs queued jobs in FIFO order until the queue is empty, including jobs
/// appended by the jobs themselves.
pub(crate) fn drain() {
	let _guard = DrainGuard::enter();
	// The queue borrow must end before the job runs: jobs push more jobs.
	while let Some(job) = QUEUE.with(|queue| queue.borrow_mut().pop_front()) {
		job();
	}
}

struct DrainGuard;

impl DrainGuard {
	fn enter() -> Self {
		DRAINING.with(|draining| draining.set(true));
		Self
	}
}

impl Drop for DrainGuard {
	fn drop(&mut self) {
		if std::thread::panicking() {
			let dropped = QUEUE.with(|queue| {
				let mut queue = queue.borrow_mut();
				let len = queue.len();
				queue.clear();
				len
			});
			tracing::warn!(dropped, "subscriber panicked; discarding queued notifications");
		}
		DRAINING.with(|draining| draining.set(false));
	}
}
