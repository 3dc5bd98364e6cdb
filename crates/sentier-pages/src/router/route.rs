//! Route values and route scopes.

use core::sync::atomic::{AtomicU64, Ordering};
use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};
use sentier_urls::{PathMatch, RoutePattern, combine_paths, segmentize};

use super::error::{RouterError, RouterResult};
use super::scope::RouterScope;
use crate::view::{BoundView, RouteProps, RouteSlot, View};

/// Identity of a registered route. Stable across rebasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(u64);

impl RouteId {
	fn next() -> Self {
		static COUNTER: AtomicU64 = AtomicU64::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for RouteId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "route#{}", self.0)
	}
}

/// Per-route configuration: `{ path, view?, props }`.
#[derive(Debug, Clone, Default)]
pub struct RouteConfig {
	/// Pattern relative to the enclosing scope's base. Empty for the
	/// scope's default route.
	pub path: String,
	pub view: Option<BoundView>,
	/// Extra props handed to the view.
	pub props: Map<String, Value>,
}

impl RouteConfig {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			..Self::default()
		}
	}

	/// The scope's default route.
	pub fn fallback() -> Self {
		Self::default()
	}

	pub fn view<F>(mut self, f: F) -> Self
	where
		F: Fn(&RouteProps) -> View + 'static,
	{
		self.view = Some(BoundView::component(f));
		self
	}

	pub fn named_view(mut self, name: impl Into<String>) -> Self {
		self.view = Some(BoundView::named(name));
		self
	}

	pub fn prop(mut self, key: impl Into<String>, value: Value) -> Self {
		self.props.insert(key.into(), value);
		self
	}
}

/// A registered route.
///
/// Immutable: a base change produces a new value with the same [`RouteId`]
/// and a recombined pattern.
#[derive(Clone)]
pub struct Route {
	id: RouteId,
	path: String,
	relative: String,
	is_default: bool,
	view: Option<BoundView>,
	props: Map<String, Value>,
}

impl Route {
	pub(crate) fn register(config: RouteConfig, base_path: &str) -> Self {
		let RouteConfig { path, view, props } = config;
		Self {
			id: RouteId::next(),
			path: combine_paths(base_path, &path),
			is_default: path.is_empty(),
			relative: path,
			view,
			props,
		}
	}

	/// Returns this route recombined with a new base path.
	pub(crate) fn rebased(&self, base_path: &str) -> Self {
		Self {
			path: combine_paths(base_path, &self.relative),
			..self.clone()
		}
	}

	pub fn id(&self) -> RouteId {
		self.id
	}

	/// The absolute pattern.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// The pattern as registered, relative to the enclosing base.
	pub fn relative_path(&self) -> &str {
		&self.relative
	}

	pub fn is_default(&self) -> bool {
		self.is_default
	}

	pub fn view(&self) -> Option<&BoundView> {
		self.view.as_ref()
	}

	pub fn props(&self) -> &Map<String, Value> {
		&self.props
	}
}

impl RoutePattern for Route {
	fn pattern(&self) -> &str {
		&self.path
	}

	fn is_default(&self) -> bool {
		self.is_default
	}
}

impl PartialEq for Route {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id && self.path == other.path
	}
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("id", &self.id)
			.field("path", &self.path)
			.field("relative", &self.relative)
			.field("is_default", &self.is_default)
			.field("view", &self.view)
			.finish()
	}
}

/// A scope's base: the pattern prefix its routes are relative to, and the
/// concrete URI prefix consumed by enclosing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base {
	pub path: String,
	pub uri: String,
}

impl Base {
	pub fn new(path: impl Into<String>) -> Self {
		let path = path.into();
		Self {
			uri: path.clone(),
			path,
		}
	}
}

/// The active route of a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMatch {
	pub route: Route,
	pub params: HashMap<String, String>,
	pub uri: String,
}

impl From<PathMatch<'_, Route>> for ActiveMatch {
	fn from(matched: PathMatch<'_, Route>) -> Self {
		Self {
			route: matched.route.clone(),
			params: matched.params,
			uri: matched.uri,
		}
	}
}

/// Base handed to nested scopes.
///
/// With nothing active this is the scope's own base. A default route keeps
/// the base path. Otherwise the path is the active pattern up to its splat,
/// and the URI is the consumed URI without the segments the splat captured.
pub(crate) fn child_base(base: &Base, active: &Option<ActiveMatch>) -> Base {
	let Some(active) = active else {
		return base.clone();
	};
	if active.route.is_default() {
		return Base {
			path: base.path.clone(),
			uri: active.uri.clone(),
		};
	}

	let route = active.route.rebased(&base.path);
	let pattern = route.path();
	match pattern.find('*') {
		Some(index) => {
			let prefix = &pattern[..index];
			Base {
				path: prefix.to_string(),
				uri: truncate_uri(&active.uri, prefix),
			}
		}
		None => Base {
			path: pattern.to_string(),
			uri: active.uri.clone(),
		},
	}
}

/// Keeps as many leading segments of `uri` as `prefix` has.
fn truncate_uri(uri: &str, prefix: &str) -> String {
	let keep = segmentize(prefix)
		.into_iter()
		.filter(|segment| !segment.is_empty())
		.count();
	let segments: Vec<&str> = segmentize(uri).into_iter().take(keep).collect();
	format!("/{}", segments.join("/"))
}

/// A route registered in a [`RouterScope`].
#[derive(Clone)]
pub struct RouteScope {
	id: RouteId,
	scope: RouterScope,
}

impl RouteScope {
	pub(crate) fn new(id: RouteId, scope: RouterScope) -> Self {
		Self { id, scope }
	}

	pub fn id(&self) -> RouteId {
		self.id
	}

	/// The current value of this route, if still registered.
	pub fn route(&self) -> Option<Route> {
		self.scope
			.routes()
			.get()
			.into_iter()
			.find(|route| route.id == self.id)
	}

	/// The scope's active match if it is this route.
	pub fn active_match(&self) -> Option<ActiveMatch> {
		self.scope
			.active_match()
			.get()
			.filter(|active| active.route.id == self.id)
	}

	pub fn is_active(&self) -> bool {
		self.active_match().is_some()
	}

	/// Parameters captured for this route, empty when inactive.
	pub fn params(&self) -> HashMap<String, String> {
		self.active_match()
			.map(|active| active.params)
			.unwrap_or_default()
	}

	/// Renders the bound view when this route is active.
	///
	/// Inactive routes and routes without a view render nothing. A named view
	/// missing from the tree's registry is an error.
	pub fn render(&self) -> RouterResult<View> {
		self.render_with(|_| View::Empty)
	}

	/// Like [`render`](Self::render), but an active route without a bound
	/// view renders `slot` with the resolved params and location.
	pub fn render_with<S>(&self, slot: S) -> RouterResult<View>
	where
		S: FnOnce(&RouteSlot) -> View,
	{
		let Some(active) = self.active_match() else {
			return Ok(View::Empty);
		};
		let location = self.scope.location().get();

		let Some(view) = active.route.view() else {
			return Ok(slot(&RouteSlot {
				params: active.params,
				location,
			}));
		};

		let component = match view {
			BoundView::Component(component) => component.clone(),
			BoundView::Named(name) => {
				self.scope.views().resolve(name).ok_or_else(|| {
					tracing::warn!(view = %name, route = %self.id, "unregistered route view");
					RouterError::InvalidView { name: name.clone() }
				})?
			}
		};

		let props = RouteProps {
			location,
			params: active.params,
			extra: active.route.props().clone(),
		};
		Ok(component(&props))
	}

	/// Removes this route from its scope.
	pub fn unmount(self) {
		self.scope.unregister_route(self.id);
	}
}

impl fmt::Debug for RouteScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteScope")
			.field("id", &self.id)
			.field("active", &self.is_active())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/", "", "/")]
	#[case("/", "intro", "intro/")]
	#[case("blog/", ":slug", "blog/:slug/")]
	fn test_register_combines_with_base(
		#[case] base: &str,
		#[case] path: &str,
		#[case] expected: &str,
	) {
		let route = Route::register(RouteConfig::new(path), base);
		assert_eq!(route.path(), expected);
		assert_eq!(route.relative_path(), path);
		assert_eq!(route.is_default(), path.is_empty());
	}

	#[rstest]
	fn test_rebase_keeps_identity() {
		let route = Route::register(RouteConfig::new("post/:id"), "/");
		let rebased = route.rebased("/blog");

		assert_eq!(rebased.id(), route.id());
		assert_eq!(rebased.path(), "blog/post/:id/");
		assert_ne!(rebased, route);
	}

	#[rstest]
	fn test_child_base_strips_splat() {
		let base = Base::new("/");
		let route = Route::register(RouteConfig::new("blog/*"), "/");
		let active = ActiveMatch {
			route,
			params: HashMap::new(),
			uri: "/blog/post".to_string(),
		};

		let child = child_base(&base, &Some(active));
		assert_eq!(child.path, "blog/");
		assert_eq!(child.uri, "/blog");
	}

	#[rstest]
	fn test_child_base_for_default_keeps_base_path() {
		let base = Base::new("/app");
		let route = Route::register(RouteConfig::fallback(), "/app");
		let active = ActiveMatch {
			route,
			params: HashMap::new(),
			uri: "/app/missing".to_string(),
		};

		let child = child_base(&base, &Some(active));
		assert_eq!(child.path, "/app");
		assert_eq!(child.uri, "/app/missing");
	}

	#[rstest]
	#[case("blog/*/", "/blog/a/b", "/blog")]
	#[case("*/", "/anything/at/all", "/")]
	#[case("users/:id/*/", "/users/7/posts", "/users/7")]
	fn test_truncate_uri_to_splat_prefix(
		#[case] pattern: &str,
		#[case] uri: &str,
		#[case] expected: &str,
	) {
		let prefix = &pattern[..pattern.find('*').unwrap()];
		assert_eq!(truncate_uri(uri, prefix), expected);
	}

	#[rstest]
	fn test_child_base_without_match() {
		let base = Base::new("/app");
		assert_eq!(child_base(&base, &None), base);
	}
}
