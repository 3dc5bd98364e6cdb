//! Links resolved against a router scope.
//!
//! A link resolves its target against the enclosing scope's base URI and
//! classifies itself against the shared location:
//!
//! - `is_current`: the resolved href equals the current pathname.
//! - `is_partially_current`: the current pathname starts with the href.
//!
//! Navigation links ([`LinkConfig::nav`]) are styled active when current, or,
//! for any href other than `/`, when partially current.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use sentier_urls::{resolve, starts_with};

use super::scope::RouterScope;
use crate::history::{Location, NavigateOptions};
use crate::view::{IntoView, View};

/// Computes extra anchor attributes from a link's state.
pub type ExtraPropsFn = Rc<dyn Fn(&LinkState) -> Vec<(String, String)>>;

/// Per-link configuration: `{ to, replace, state, get_extra_props }`.
#[derive(Clone)]
pub struct LinkConfig {
	pub to: String,
	pub replace: bool,
	pub state: Option<Value>,
	pub get_extra_props: Option<ExtraPropsFn>,
}

impl Default for LinkConfig {
	fn default() -> Self {
		Self {
			to: "#".to_string(),
			replace: false,
			state: None,
			get_extra_props: None,
		}
	}
}

impl LinkConfig {
	pub fn new(to: impl Into<String>) -> Self {
		Self {
			to: to.into(),
			..Self::default()
		}
	}

	/// A navigation link: gets `class="active"` when active.
	pub fn nav(to: impl Into<String>) -> Self {
		Self::new(to).extra_props(nav_link_props)
	}

	pub fn replace(mut self, replace: bool) -> Self {
		self.replace = replace;
		self
	}

	pub fn state(mut self, state: Value) -> Self {
		self.state = Some(state);
		self
	}

	pub fn extra_props<F>(mut self, f: F) -> Self
	where
		F: Fn(&LinkState) -> Vec<(String, String)> + 'static,
	{
		self.get_extra_props = Some(Rc::new(f));
		self
	}
}

impl fmt::Debug for LinkConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LinkConfig")
			.field("to", &self.to)
			.field("replace", &self.replace)
			.field("state", &self.state)
			.field("get_extra_props", &self.get_extra_props.is_some())
			.finish()
	}
}

/// A link's classification against the current location.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkState {
	pub location: Location,
	pub href: String,
	pub is_partially_current: bool,
	pub is_current: bool,
}

impl LinkState {
	/// Classifies `href` against `location`.
	pub fn classify(href: String, location: Location) -> Self {
		let is_partially_current = starts_with(&location.pathname, &href);
		let is_current = href == location.pathname;
		Self {
			location,
			href,
			is_partially_current,
			is_current,
		}
	}
}

/// Extra props of a navigation link.
///
/// The root href is only active when current; every other href is active
/// when partially current.
pub fn nav_link_props(state: &LinkState) -> Vec<(String, String)> {
	let is_active = if state.href == "/" {
		state.is_current
	} else {
		state.is_partially_current || state.is_current
	};
	if is_active {
		vec![("class".to_string(), "active".to_string())]
	} else {
		Vec::new()
	}
}

/// A link bound to a router scope.
#[derive(Debug, Clone)]
pub struct Link {
	scope: RouterScope,
	config: LinkConfig,
}

impl Link {
	pub(crate) fn new(scope: RouterScope, config: LinkConfig) -> Self {
		Self { scope, config }
	}

	pub fn config(&self) -> &LinkConfig {
		&self.config
	}

	/// The target resolved against the scope's base URI.
	pub fn href(&self) -> String {
		let base = self.scope.base().get();
		resolve(&self.config.to, &base.uri)
	}

	pub fn state(&self) -> LinkState {
		LinkState::classify(self.href(), self.scope.location().get())
	}

	/// Attributes from the configured extra-props callback.
	pub fn extra_props(&self) -> Vec<(String, String)> {
		match &self.config.get_extra_props {
			Some(get_extra_props) => get_extra_props(&self.state()),
			None => Vec::new(),
		}
	}

	/// Renders an anchor element.
	pub fn render(&self, children: impl IntoView) -> View {
		let state = self.state();
		let mut anchor = View::element("a").attr("href", state.href.clone());
		if state.is_current {
			anchor = anchor.attr("aria-current", "page");
		}
		if let Some(get_extra_props) = &self.config.get_extra_props {
			for (name, value) in get_extra_props(&state) {
				anchor = anchor.attr(name, value);
			}
		}
		anchor.child(children).into_view()
	}

	/// Navigates to the link's target.
	///
	/// Following a link to the current page replaces the entry instead of
	/// adding a duplicate.
	pub fn click(&self) {
		let state = self.state();
		let options = NavigateOptions {
			state: self.config.state.clone(),
			replace: state.is_current || self.config.replace,
		};
		self.scope.navigate(&state.href, options);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/", "/", true, true)]
	#[case("/", "/blog", false, true)]
	#[case("/blog", "/blog/post", false, true)]
	#[case("/blog", "/blog", true, true)]
	#[case("/blog", "/about", false, false)]
	fn test_classify(
		#[case] href: &str,
		#[case] pathname: &str,
		#[case] current: bool,
		#[case] partial: bool,
	) {
		let state = LinkState::classify(href.to_string(), Location::from_url(pathname));
		assert_eq!(state.is_current, current);
		assert_eq!(state.is_partially_current, partial);
	}

	#[rstest]
	#[case("/", "/", true)]
	#[case("/", "/blog", false)]
	#[case("/blog", "/blog/post", true)]
	#[case("/blog", "/blog", true)]
	#[case("/video", "/video2", true)]
	#[case("/blog", "/about", false)]
	fn test_nav_link_props(#[case] href: &str, #[case] pathname: &str, #[case] active: bool) {
		let state = LinkState::classify(href.to_string(), Location::from_url(pathname));
		let props = nav_link_props(&state);
		assert_eq!(
			props == vec![("class".to_string(), "active".to_string())],
			active
		);
	}

	#[rstest]
	fn test_default_target() {
		assert_eq!(LinkConfig::default().to, "#");
	}
}
