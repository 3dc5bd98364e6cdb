//! In-memory navigation log.
//!
//! Used wherever no live document exists: server-side rendering and tests.

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

use super::backend::{HistoryBackend, PopCallback, PopListener, RawLocation};
use super::{HistoryError, Location};

type PopListeners = Rc<RefCell<Vec<(u64, PopCallback)>>>;

/// An ordered list of entries with a current index.
///
/// `push_state` drops any forward entries before appending, like a browser.
/// Entry creation never notifies pop listeners; only [`back`](Self::back),
/// [`forward`](Self::forward) and [`go`](Self::go) do.
pub struct MemoryBackend {
	entries: RefCell<Vec<RawLocation>>,
	index: Cell<usize>,
	limit: Option<usize>,
	pop_listeners: PopListeners,
	next_listener_id: Cell<u64>,
}

impl MemoryBackend {
	/// Creates a log with a single entry for `initial` (path and optional
	/// query string).
	pub fn new(initial: &str) -> Self {
		let location = Location::from_url(initial);
		Self {
			entries: RefCell::new(vec![RawLocation {
				pathname: location.pathname,
				search: location.search,
				state: None,
			}]),
			index: Cell::new(0),
			limit: None,
			pop_listeners: Rc::new(RefCell::new(Vec::new())),
			next_listener_id: Cell::new(0),
		}
	}

	/// Caps the number of entries; `push_state` beyond the cap fails with
	/// [`HistoryError::QuotaExceeded`].
	pub fn with_entry_limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}

	/// Number of entries in the log.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	/// Index of the current entry.
	pub fn index(&self) -> usize {
		self.index.get()
	}

	pub fn back(&self) {
		self.go(-1);
	}

	pub fn forward(&self) {
		self.go(1);
	}

	/// Moves the current index by `delta`, clamped to the log, and notifies
	/// pop listeners if it changed.
	pub fn go(&self, delta: isize) {
		let last = self.len().saturating_sub(1);
		let current = self.index.get();
		let target = current.saturating_add_signed(delta).min(last);
		if target == current {
			return;
		}
		self.index.set(target);
		tracing::debug!(from = current, to = target, "memory history moved");

		let listeners: Vec<PopCallback> = self
			.pop_listeners
			.borrow()
			.iter()
			.map(|(_, callback)| Rc::clone(callback))
			.collect();
		for callback in listeners {
			callback();
		}
	}

	fn entry_for(state: Option<Value>, url: &str) -> RawLocation {
		let location = Location::from_url(url);
		RawLocation {
			pathname: location.pathname,
			search: location.search,
			state,
		}
	}

	fn push_entry(&self, entry: RawLocation) {
		let mut entries = self.entries.borrow_mut();
		let index = self.index.get();
		entries.truncate(index + 1);
		entries.push(entry);
		self.index.set(entries.len() - 1);
	}

	fn replace_entry(&self, entry: RawLocation) {
		let index = self.index.get();
		if let Some(current) = self.entries.borrow_mut().get_mut(index) {
			*current = entry;
		}
	}
}

impl Default for MemoryBackend {
	fn default() -> Self {
		Self::new("/")
	}
}

impl HistoryBackend for MemoryBackend {
	fn location(&self) -> RawLocation {
		self.entries
			.borrow()
			.get(self.index.get())
			.cloned()
			.unwrap_or_default()
	}

	fn push_state(&self, state: &Value, url: &str) -> Result<(), HistoryError> {
		if let Some(limit) = self.limit {
			// Forward entries are dropped before the new one is appended.
			if self.index.get() + 1 >= limit {
				return Err(HistoryError::QuotaExceeded { limit });
			}
		}
		self.push_entry(Self::entry_for(Some(state.clone()), url));
		Ok(())
	}

	fn replace_state(&self, state: &Value, url: &str) -> Result<(), HistoryError> {
		self.replace_entry(Self::entry_for(Some(state.clone()), url));
		Ok(())
	}

	fn hard_navigate(&self, url: &str, replace: bool) {
		let entry = Self::entry_for(None, url);
		if replace {
			self.replace_entry(entry);
		} else {
			self.push_entry(entry);
		}
	}

	fn on_pop(&self, callback: PopCallback) -> PopListener {
		let id = self.next_listener_id.get();
		self.next_listener_id.set(id + 1);
		self.pop_listeners.borrow_mut().push((id, callback));

		let listeners = Rc::downgrade(&self.pop_listeners);
		PopListener::new(move || {
			if let Some(listeners) = listeners.upgrade() {
				listeners.borrow_mut().retain(|(other, _)| *other != id);
			}
		})
	}
}
