//! Browser History API backend.
//!
//! State objects cross the JS boundary as JSON.

use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, Window};

use super::HistoryError;
use super::backend::{HistoryBackend, PopCallback, PopListener, RawLocation};

/// Wraps `window.history` and `window.location`.
#[derive(Debug, Clone)]
pub struct BrowserBackend {
	window: Window,
}

impl BrowserBackend {
	/// Returns `None` when no window is available (e.g. inside a worker).
	pub fn new() -> Option<Self> {
		web_sys::window().map(|window| Self { window })
	}

	fn history(&self) -> Result<web_sys::History, HistoryError> {
		self.window.history().map_err(js_error)
	}
}

fn js_error(error: JsValue) -> HistoryError {
	HistoryError::Backend(format!("{error:?}"))
}

fn to_js(state: &Value) -> Result<JsValue, HistoryError> {
	let text = serde_json::to_string(state)?;
	js_sys::JSON::parse(&text).map_err(js_error)
}

fn from_js(value: JsValue) -> Option<Value> {
	if value.is_null() || value.is_undefined() {
		return None;
	}
	let text = js_sys::JSON::stringify(&value).ok()?.as_string()?;
	serde_json::from_str(&text).ok()
}

impl HistoryBackend for BrowserBackend {
	fn location(&self) -> RawLocation {
		let location = self.window.location();
		let state = self
			.window
			.history()
			.ok()
			.and_then(|history| history.state().ok())
			.and_then(from_js);
		RawLocation {
			pathname: location.pathname().unwrap_or_else(|_| "/".to_string()),
			search: location.search().unwrap_or_default(),
			state,
		}
	}

	fn push_state(&self, state: &Value, url: &str) -> Result<(), HistoryError> {
		let state = to_js(state)?;
		self.history()?
			.push_state_with_url(&state, "", Some(url))
			.map_err(js_error)
	}

	fn replace_state(&self, state: &Value, url: &str) -> Result<(), HistoryError> {
		let state = to_js(state)?;
		self.history()?
			.replace_state_with_url(&state, "", Some(url))
			.map_err(js_error)
	}

	fn hard_navigate(&self, url: &str, replace: bool) {
		let location = self.window.location();
		let result = if replace {
			location.replace(url)
		} else {
			location.assign(url)
		};
		if let Err(error) = result {
			tracing::warn!(url, ?error, "document navigation failed");
		}
	}

	fn on_pop(&self, callback: PopCallback) -> PopListener {
		let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| callback());
		if let Err(error) = self
			.window
			.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
		{
			tracing::warn!(?error, "failed to register popstate listener");
		}

		let window = self.window.clone();
		PopListener::new(move || {
			let _ = window.remove_event_listener_with_callback(
				"popstate",
				closure.as_ref().unchecked_ref(),
			);
			drop(closure);
		})
	}
}
