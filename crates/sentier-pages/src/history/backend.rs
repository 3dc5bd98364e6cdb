//! Navigable source abstraction.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::HistoryError;

/// A location as read from a backend, before a key is derived.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawLocation {
	pub pathname: String,
	/// Query string with its leading `?`, or empty.
	pub search: String,
	pub state: Option<Value>,
}

/// Callback invoked when the backend moves back or forward.
pub type PopCallback = Rc<dyn Fn()>;

/// Handle for a registered pop callback.
///
/// Dropping the handle keeps the callback registered; call
/// [`PopListener::remove`] to detach it.
#[must_use = "dropping a PopListener keeps the callback registered; call `remove()`"]
pub struct PopListener {
	remove: Option<Box<dyn FnOnce()>>,
}

impl PopListener {
	pub fn new(remove: impl FnOnce() + 'static) -> Self {
		Self {
			remove: Some(Box::new(remove)),
		}
	}

	/// Detaches the callback from the backend.
	pub fn remove(mut self) {
		if let Some(remove) = self.remove.take() {
			remove();
		}
	}
}

impl Drop for PopListener {
	fn drop(&mut self) {
		// The removal closure may own the registered callback; leaking it keeps
		// the callback valid for the rest of the page.
		if let Some(remove) = self.remove.take() {
			std::mem::forget(remove);
		}
	}
}

impl fmt::Debug for PopListener {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PopListener")
			.field("attached", &self.remove.is_some())
			.finish()
	}
}

/// A navigable backend: a live document or an in-memory entry log.
pub trait HistoryBackend {
	/// Reads the current location.
	fn location(&self) -> RawLocation;

	/// Appends a new entry.
	fn push_state(&self, state: &Value, url: &str) -> Result<(), HistoryError>;

	/// Overwrites the current entry.
	fn replace_state(&self, state: &Value, url: &str) -> Result<(), HistoryError>;

	/// Whole-document navigation, used when entry creation fails.
	fn hard_navigate(&self, url: &str, replace: bool);

	/// Registers a callback for back/forward navigation.
	fn on_pop(&self, callback: PopCallback) -> PopListener;
}
