//! History Source.
//!
//! A uniform navigation interface over a live document
//! ([`BrowserBackend`], wasm32 only) and an in-memory entry log
//! ([`MemoryBackend`]).
//!
//! ## Navigation Flow
//!
//! 1. [`History::navigate`] stamps the state with a fresh key and asks the
//!    backend for a new (or replacing) entry.
//! 2. If the backend refuses, the failure is logged and the backend performs a
//!    whole-document navigation instead. The caller never sees the error.
//! 3. Every listener registered with [`History::listen`] is called with a
//!    `Push` or `Replace` event.
//!
//! Back/forward navigation reported by the backend reaches the same listeners
//! as a `Pop` event.
//!
//! ## Example
//!
//! ```
//! use sentier_pages::history::{Action, History, NavigateOptions};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let history = History::memory("/");
//! let actions = Rc::new(RefCell::new(Vec::new()));
//!
//! let log = actions.clone();
//! let unlisten = history.listen(move |event| log.borrow_mut().push(event.action));
//!
//! history.navigate("/blog", NavigateOptions::default());
//! assert_eq!(history.location().pathname, "/blog");
//! assert_eq!(*actions.borrow(), vec![Action::Push]);
//!
//! unlisten.unlisten();
//! ```

mod backend;
#[cfg(target_arch = "wasm32")]
mod browser;
mod error;
mod memory;

pub use backend::{HistoryBackend, PopCallback, PopListener, RawLocation};
#[cfg(target_arch = "wasm32")]
pub use browser::BrowserBackend;
pub use error::HistoryError;
pub use memory::MemoryBackend;

use core::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of an entry that was not created through [`History::navigate`].
pub const INITIAL_KEY: &str = "initial";

/// The current navigable location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
	pub pathname: String,
	/// Query string including its leading `?`, or empty.
	pub search: String,
	pub state: Option<Value>,
	/// Unique key of the navigation entry.
	pub key: String,
}

impl Location {
	/// Builds a location from a URL path, splitting off the query string.
	/// A `#fragment` is discarded.
	///
	/// ```
	/// use sentier_pages::history::Location;
	///
	/// let location = Location::from_url("/search?q=rust#top");
	/// assert_eq!(location.pathname, "/search");
	/// assert_eq!(location.search, "?q=rust");
	/// assert_eq!(location.key, "initial");
	/// ```
	pub fn from_url(url: &str) -> Self {
		let url = url.split('#').next().unwrap_or_default();
		let (pathname, query) = match url.split_once('?') {
			Some((pathname, query)) => (pathname, query),
			None => (url, ""),
		};
		Self {
			pathname: if pathname.is_empty() {
				"/".to_string()
			} else {
				pathname.to_string()
			},
			search: if query.is_empty() {
				String::new()
			} else {
				format!("?{query}")
			},
			state: None,
			key: INITIAL_KEY.to_string(),
		}
	}

	/// Builds a location from a backend reading, deriving the key from the
	/// entry's state.
	pub fn from_raw(raw: RawLocation) -> Self {
		let key = raw
			.state
			.as_ref()
			.and_then(|state| state.get("key"))
			.and_then(|key| match key {
				Value::String(key) => Some(key.clone()),
				Value::Number(key) => Some(key.to_string()),
				_ => None,
			})
			.unwrap_or_else(|| INITIAL_KEY.to_string());
		Self {
			pathname: raw.pathname,
			search: raw.search,
			state: raw.state,
			key,
		}
	}

	/// Path plus query string.
	pub fn href(&self) -> String {
		format!("{}{}", self.pathname, self.search)
	}
}

/// The kind of navigation that produced a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
	Push,
	Replace,
	Pop,
}

/// Delivered to history listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEvent {
	pub location: Location,
	pub action: Action,
}

/// Options for [`History::navigate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigateOptions {
	/// Caller state stored with the entry.
	pub state: Option<Value>,
	/// Overwrite the current entry instead of appending.
	pub replace: bool,
}

impl NavigateOptions {
	pub fn replace() -> Self {
		Self {
			replace: true,
			..Self::default()
		}
	}

	pub fn with_state(mut self, state: Value) -> Self {
		self.state = Some(state);
		self
	}
}

thread_local! {
	static LAST_KEY: Cell<u64> = const { Cell::new(0) };
	static GLOBAL: RefCell<Option<History>> = const { RefCell::new(None) };
}

fn now_millis() -> u64 {
	#[cfg(target_arch = "wasm32")]
	{
		js_sys::Date::now() as u64
	}
	#[cfg(not(target_arch = "wasm32"))]
	{
		std::time::SystemTime::now()
			.duration_since(std::time::UNIX_EPOCH)
			.map(|elapsed| elapsed.as_millis() as u64)
			.unwrap_or_default()
	}
}

/// Generates a navigation key from the wall clock.
///
/// Keys are strictly increasing on a thread, even for navigations within the
/// same millisecond.
pub fn next_key() -> String {
	LAST_KEY.with(|last| {
		let key = now_millis().max(last.get() + 1);
		last.set(key);
		key.to_string()
	})
}

fn stamp_state(state: Option<Value>, key: String) -> Value {
	let mut map = match state {
		Some(Value::Object(map)) => map,
		_ => Map::new(),
	};
	map.insert("key".to_string(), Value::String(key));
	Value::Object(map)
}

type Listener = Rc<dyn Fn(&HistoryEvent)>;

struct HistoryInner {
	backend: Rc<dyn HistoryBackend>,
	listeners: RefCell<Vec<(u64, Listener)>>,
	next_listener_id: Cell<u64>,
}

impl HistoryInner {
	fn location(&self) -> Location {
		Location::from_raw(self.backend.location())
	}

	fn remove_listener(&self, id: u64) {
		self.listeners.borrow_mut().retain(|(other, _)| *other != id);
	}
}

/// Shared navigation source.
///
/// Cloning yields another handle to the same source.
#[derive(Clone)]
pub struct History {
	inner: Rc<HistoryInner>,
}

impl History {
	/// Wraps a backend.
	pub fn new(backend: Rc<dyn HistoryBackend>) -> Self {
		Self {
			inner: Rc::new(HistoryInner {
				backend,
				listeners: RefCell::new(Vec::new()),
				next_listener_id: Cell::new(0),
			}),
		}
	}

	/// A history over a fresh [`MemoryBackend`] starting at `initial`.
	pub fn memory(initial: &str) -> Self {
		Self::new(Rc::new(MemoryBackend::new(initial)))
	}

	/// The thread's shared history: the browser when a window exists, an
	/// in-memory log starting at `/` otherwise.
	pub fn global() -> Self {
		GLOBAL.with(|global| {
			global
				.borrow_mut()
				.get_or_insert_with(Self::detect)
				.clone()
		})
	}

	fn detect() -> Self {
		#[cfg(target_arch = "wasm32")]
		{
			if let Some(browser) = BrowserBackend::new() {
				return Self::new(Rc::new(browser));
			}
		}
		Self::memory("/")
	}

	/// Reads the current location from the backend.
	pub fn location(&self) -> Location {
		self.inner.location()
	}

	/// Returns the backend.
	pub fn backend(&self) -> Rc<dyn HistoryBackend> {
		Rc::clone(&self.inner.backend)
	}

	/// Registers a listener for navigation events.
	pub fn listen<F>(&self, callback: F) -> Unlisten
	where
		F: Fn(&HistoryEvent) + 'static,
	{
		let id = self.inner.next_listener_id.get();
		self.inner.next_listener_id.set(id + 1);
		let callback: Listener = Rc::new(callback);
		self.inner
			.listeners
			.borrow_mut()
			.push((id, Rc::clone(&callback)));

		let weak: Weak<HistoryInner> = Rc::downgrade(&self.inner);
		let pop = self.inner.backend.on_pop(Rc::new(move || {
			if let Some(inner) = weak.upgrade() {
				callback(&HistoryEvent {
					location: inner.location(),
					action: Action::Pop,
				});
			}
		}));

		let weak = Rc::downgrade(&self.inner);
		Unlisten {
			remove: Some(Box::new(move || {
				pop.remove();
				if let Some(inner) = weak.upgrade() {
					inner.remove_listener(id);
				}
			})),
		}
	}

	/// Navigates to `to`.
	///
	/// Never fails: if the backend cannot create the entry, it falls back to
	/// a whole-document navigation.
	pub fn navigate(&self, to: &str, options: NavigateOptions) {
		let NavigateOptions { state, replace } = options;
		let state = stamp_state(state, next_key());
		let backend = &self.inner.backend;

		let result = if replace {
			backend.replace_state(&state, to)
		} else {
			backend.push_state(&state, to)
		};
		if let Err(error) = result {
			tracing::warn!(%error, to, replace, "history entry creation failed, falling back to document navigation");
			backend.hard_navigate(to, replace);
		}

		let event = HistoryEvent {
			location: self.location(),
			action: if replace {
				Action::Replace
			} else {
				Action::Push
			},
		};
		tracing::debug!(to, action = ?event.action, "navigated");

		let listeners: Vec<Listener> = self
			.inner
			.listeners
			.borrow()
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect();
		for listener in listeners {
			listener(&event);
		}
	}

	/// Number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.inner.listeners.borrow().len()
	}

	/// Returns `true` if both handles share the same source.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for History {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("History")
			.field("location", &self.location())
			.field("listeners", &self.listener_count())
			.finish()
	}
}

/// Handle returned by [`History::listen`].
#[must_use = "dropping an Unlisten keeps the listener registered; call `unlisten()`"]
pub struct Unlisten {
	remove: Option<Box<dyn FnOnce()>>,
}

impl Unlisten {
	/// Removes the listener.
	pub fn unlisten(mut self) {
		if let Some(remove) = self.remove.take() {
			remove();
		}
	}
}

impl fmt::Debug for Unlisten {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Unlisten").finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("/", "/", "")]
	#[case("", "/", "")]
	#[case("/a/b?x=1&y=2", "/a/b", "?x=1&y=2")]
	#[case("/a?", "/a", "")]
	#[case("/a#frag", "/a", "")]
	fn test_location_from_url(#[case] url: &str, #[case] pathname: &str, #[case] search: &str) {
		let location = Location::from_url(url);
		assert_eq!(location.pathname, pathname);
		assert_eq!(location.search, search);
	}

	#[rstest]
	fn test_location_key_from_state() {
		let raw = RawLocation {
			pathname: "/".to_string(),
			search: String::new(),
			state: Some(json!({"key": "123", "scroll": 4})),
		};
		assert_eq!(Location::from_raw(raw).key, "123");

		let raw = RawLocation {
			pathname: "/".to_string(),
			search: String::new(),
			state: Some(json!({"key": 99})),
		};
		assert_eq!(Location::from_raw(raw).key, "99");
	}

	#[rstest]
	fn test_keys_strictly_increase() {
		let keys: Vec<u64> = (0..50)
			.map(|_| next_key().parse().unwrap())
			.collect();
		assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
	}

	#[rstest]
	#[case(None, json!({}))]
	#[case(Some(json!({"from": "home"})), json!({"from": "home"}))]
	#[case(Some(json!(5)), json!({}))]
	fn test_stamp_state(#[case] state: Option<Value>, #[case] expected_rest: Value) {
		let stamped = stamp_state(state, "k".to_string());
		let mut expected = expected_rest;
		expected["key"] = json!("k");
		assert_eq!(stamped, expected);
	}

	#[rstest]
	fn test_navigate_notifies_with_action() {
		let history = History::memory("/");
		let events = Rc::new(RefCell::new(Vec::new()));
		let log = Rc::clone(&events);
		let unlisten = history.listen(move |event| log.borrow_mut().push(event.clone()));

		history.navigate("/a", NavigateOptions::default());
		history.navigate("/b", NavigateOptions::replace().with_state(json!({"x": 1})));

		let events = events.borrow();
		assert_eq!(events.len(), 2);
		assert_eq!(events[0].action, Action::Push);
		assert_eq!(events[0].location.pathname, "/a");
		assert_eq!(events[1].action, Action::Replace);
		assert_eq!(events[1].location.pathname, "/b");
		assert_eq!(events[1].location.state.as_ref().unwrap()["x"], json!(1));
		assert_ne!(events[0].location.key, events[1].location.key);
		unlisten.unlisten();
	}

	#[rstest]
	fn test_equal_states_get_distinct_keys() {
		let history = History::memory("/");
		history.navigate("/same", NavigateOptions::default());
		let first = history.location().key;
		history.navigate("/same", NavigateOptions::default());
		let second = history.location().key;
		assert_ne!(first, second);
	}

	#[rstest]
	fn test_quota_falls_back_to_document_navigation() {
		let backend = Rc::new(MemoryBackend::new("/").with_entry_limit(1));
		let history = History::new(backend.clone());

		history.navigate("/overflow", NavigateOptions::default());

		let location = history.location();
		assert_eq!(location.pathname, "/overflow");
		assert!(location.state.is_none());
		assert_eq!(location.key, INITIAL_KEY);
		assert_eq!(backend.len(), 2);
	}

	#[rstest]
	fn test_pop_reaches_listeners() {
		let backend = Rc::new(MemoryBackend::new("/"));
		let history = History::new(backend.clone());
		let events = Rc::new(RefCell::new(Vec::new()));
		let log = Rc::clone(&events);
		let unlisten = history.listen(move |event| {
			log.borrow_mut()
				.push((event.action, event.location.pathname.clone()))
		});

		history.navigate("/next", NavigateOptions::default());
		backend.back();

		assert_eq!(
			*events.borrow(),
			vec![
				(Action::Push, "/next".to_string()),
				(Action::Pop, "/".to_string())
			]
		);

		unlisten.unlisten();
		backend.forward();
		assert_eq!(events.borrow().len(), 2);
		assert_eq!(history.listener_count(), 0);
	}

	#[rstest]
	fn test_global_is_shared() {
		assert!(History::global().ptr_eq(&History::global()));
	}
}
