//! Router scopes.
//!
//! A tree of scopes shares one location store and one history. Each scope
//! owns its route collection, its base and its active match, and exposes a
//! derived child base to the scopes nested inside it.

use core::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use sentier_core::{ReadStore, Readable, Subscription, Writable, derived, derived2};
use sentier_urls::{match_route, pick};

use super::error::{RouterError, RouterResult};
use super::link::{Link, LinkConfig};
use super::route::{ActiveMatch, Base, Route, RouteConfig, RouteId, RouteScope, child_base};
use crate::config::{RenderMode, RouterConfig, validate_basepath};
use crate::history::{History, Location, NavigateOptions, Unlisten};
use crate::view::{View, ViewRegistry};

/// State shared by every scope of one router tree.
struct RouterTree {
	history: History,
	location: Writable<Location>,
	views: ViewRegistry,
	mode: RenderMode,
	unlisten: RefCell<Option<Unlisten>>,
}

/// What a scope routes against: the shared location and the scope's base.
///
/// Both travel in one value so a nested scope never sees a new location with
/// a stale base, or the reverse.
#[derive(Debug, Clone, PartialEq)]
struct ScopeContext {
	location: Location,
	base: Base,
}

/// A context together with the route selected in it.
#[derive(Debug, Clone, PartialEq)]
struct Selection {
	context: ScopeContext,
	active: Option<ActiveMatch>,
}

/// Picks the best route with every pattern combined against the context base.
///
/// Combining here rather than trusting the stored patterns keeps the
/// selection right while a base change is still rebasing the route list.
fn select(routes: &[Route], context: &ScopeContext) -> Option<ActiveMatch> {
	let routes: Vec<Route> = routes
		.iter()
		.map(|route| route.rebased(&context.base.path))
		.collect();
	pick(&routes, &context.location.pathname).map(ActiveMatch::from)
}

struct ScopeInner {
	tree: Rc<RouterTree>,
	/// Set on the root scope only.
	root_base: Option<Writable<Base>>,
	context: ReadStore<ScopeContext>,
	base: ReadStore<Base>,
	routes: Writable<Vec<Route>>,
	active: Writable<Option<ActiveMatch>>,
	/// Live mode: the reactive selection that feeds `active`.
	selection: Option<ReadStore<Selection>>,
	/// Context handed to nested scopes.
	child_context: ReadStore<ScopeContext>,
	router_base: ReadStore<Base>,
	/// Static mode: an active match was already chosen.
	has_active: Cell<bool>,
	subscriptions: RefCell<Vec<Subscription>>,
}

/// Builder for a root [`RouterScope`].
pub struct RouterScopeBuilder {
	config: RouterConfig,
	history: Option<History>,
	views: Option<ViewRegistry>,
}

impl RouterScopeBuilder {
	/// Uses `history` instead of [`History::global`].
	pub fn history(mut self, history: History) -> Self {
		self.history = Some(history);
		self
	}

	/// Named views available to every route in the tree.
	pub fn views(mut self, views: ViewRegistry) -> Self {
		self.views = Some(views);
		self
	}

	/// Validates the configuration and creates the root scope.
	pub fn mount(self) -> RouterResult<RouterScope> {
		let Self {
			config,
			history,
			views,
		} = self;
		config.validate()?;

		let mode = config.resolved_mode();
		let history = history.unwrap_or_else(History::global);
		let initial = match &config.url {
			Some(url) => Location::from_url(url),
			None => history.location(),
		};

		let tree = Rc::new(RouterTree {
			history,
			location: Writable::new(initial),
			views: views.unwrap_or_default(),
			mode,
			unlisten: RefCell::new(None),
		});

		if mode == RenderMode::Live {
			let location = tree.location.clone();
			let unlisten = tree
				.history
				.listen(move |event| location.set(event.location.clone()));
			*tree.unlisten.borrow_mut() = Some(unlisten);
			tracing::debug!("root router listening to history");
		}

		let root_base = Writable::new(Base::new(config.basepath.clone()));
		let context = derived2(
			&tree.location,
			&root_base,
			|location: &Location, base: &Base| ScopeContext {
				location: location.clone(),
				base: base.clone(),
			},
		);
		tracing::debug!(basepath = %config.basepath, ?mode, "mounted root router scope");
		Ok(RouterScope::create(tree, Some(root_base), context))
	}
}

/// A router scope.
///
/// Cloning yields another handle to the same scope.
#[derive(Clone)]
pub struct RouterScope {
	inner: Rc<ScopeInner>,
}

impl RouterScope {
	pub fn builder(config: RouterConfig) -> RouterScopeBuilder {
		RouterScopeBuilder {
			config,
			history: None,
			views: None,
		}
	}

	/// Mounts a root scope over the thread's shared history.
	pub fn root(config: RouterConfig) -> RouterResult<Self> {
		Self::builder(config).mount()
	}

	fn create(
		tree: Rc<RouterTree>,
		root_base: Option<Writable<Base>>,
		context: ReadStore<ScopeContext>,
	) -> Self {
		let routes: Writable<Vec<Route>> = Writable::new(Vec::new());
		let active: Writable<Option<ActiveMatch>> = Writable::new(None);
		let base = derived(&context, |context: &ScopeContext| context.base.clone());
		let mut subscriptions = Vec::new();

		// Recombine every stored pattern whenever the base changes.
		let stored = routes.clone();
		subscriptions.push(base.subscribe(move |base: &Base| {
			let path = base.path.clone();
			stored.update(|current| current.iter().map(|route| route.rebased(&path)).collect());
		}));

		let (selection, child_context) = match tree.mode {
			RenderMode::Live => {
				let selection = derived2(
					&context,
					&routes,
					|context: &ScopeContext, routes: &Vec<Route>| Selection {
						active: select(routes, context),
						context: context.clone(),
					},
				);
				let writer = active.clone();
				subscriptions.push(selection.subscribe(move |selection: &Selection| {
					tracing::trace!(
						route = ?selection.active.as_ref().map(|m| m.route.id()),
						"active route recomputed"
					);
					writer.set(selection.active.clone());
				}));
				let child_context = derived(&selection, |selection: &Selection| ScopeContext {
					location: selection.context.location.clone(),
					base: child_base(&selection.context.base, &selection.active),
				});
				(Some(selection), child_context)
			}
			RenderMode::Static => {
				let child_context = derived2(
					&context,
					&active,
					|context: &ScopeContext, active: &Option<ActiveMatch>| ScopeContext {
						location: context.location.clone(),
						base: child_base(&context.base, active),
					},
				);
				(None, child_context)
			}
		};
		let router_base = derived(&child_context, |context: &ScopeContext| context.base.clone());

		Self {
			inner: Rc::new(ScopeInner {
				tree,
				root_base,
				context,
				base,
				routes,
				active,
				selection,
				child_context,
				router_base,
				has_active: Cell::new(false),
				subscriptions: RefCell::new(subscriptions),
			}),
		}
	}

	/// Creates a scope nested inside this one. Its base follows this scope's
	/// child base.
	pub fn nested(&self) -> Self {
		Self::create(
			Rc::clone(&self.inner.tree),
			None,
			self.inner.child_context.clone(),
		)
	}

	pub fn is_root(&self) -> bool {
		self.inner.root_base.is_some()
	}

	pub fn mode(&self) -> RenderMode {
		self.inner.tree.mode
	}

	pub fn history(&self) -> &History {
		&self.inner.tree.history
	}

	pub fn views(&self) -> &ViewRegistry {
		&self.inner.tree.views
	}

	/// The shared location, read-only.
	pub fn location(&self) -> ReadStore<Location> {
		self.inner.tree.location.read_only()
	}

	pub fn base(&self) -> ReadStore<Base> {
		self.inner.base.clone()
	}

	/// The base handed to nested scopes.
	pub fn router_base(&self) -> ReadStore<Base> {
		self.inner.router_base.clone()
	}

	pub fn routes(&self) -> ReadStore<Vec<Route>> {
		self.inner.routes.read_only()
	}

	pub fn active_match(&self) -> ReadStore<Option<ActiveMatch>> {
		self.inner.active.read_only()
	}

	/// Registers a route in this scope.
	///
	/// In static mode the first route that matches the current location when
	/// it registers becomes the active match and stays so for the pass.
	pub fn register_route(&self, config: RouteConfig) -> RouteScope {
		let base = self.inner.base.get();
		let route = Route::register(config, &base.path);
		let id = route.id();
		tracing::debug!(%id, pattern = route.path(), "registering route");

		if self.mode() == RenderMode::Static && !self.inner.has_active.get() {
			let pathname = self.inner.tree.location.get().pathname;
			if let Some(matched) = match_route(&route, &pathname) {
				self.inner.active.set(Some(ActiveMatch::from(matched)));
				self.inner.has_active.set(true);
			}
		}

		self.inner.routes.update(|routes| {
			let mut routes = routes.clone();
			routes.push(route);
			routes
		});
		RouteScope::new(id, self.clone())
	}

	/// Removes a route. Unknown ids are ignored.
	pub fn unregister_route(&self, id: RouteId) {
		let routes = self.inner.routes.get();
		if !routes.iter().any(|route| route.id() == id) {
			return;
		}
		tracing::debug!(%id, "unregistering route");
		self.inner.routes.set(
			routes
				.into_iter()
				.filter(|route| route.id() != id)
				.collect(),
		);
	}

	/// Picks the active route against the current location and publishes it.
	///
	/// Live scopes already do this on every location or route change. In a
	/// static pass a match, once chosen, stays: recomputing returns it
	/// unchanged, and only a scope with no match yet picks (and keeps) one.
	pub fn recompute(&self) -> Option<ActiveMatch> {
		let is_static = self.mode() == RenderMode::Static;
		if is_static && self.inner.has_active.get() {
			return self.inner.active.get();
		}

		let matched = match &self.inner.selection {
			Some(selection) => selection.get().active,
			None => select(&self.inner.routes.get(), &self.inner.context.get()),
		};
		tracing::trace!(route = ?matched.as_ref().map(|m| m.route.id()), "active route recomputed");
		if is_static && matched.is_some() {
			self.inner.has_active.set(true);
		}
		self.inner.active.set(matched.clone());
		matched
	}

	/// Renders the active route's view, or `fallback` when nothing matches.
	pub fn render_active<F>(&self, fallback: F) -> RouterResult<View>
	where
		F: FnOnce() -> View,
	{
		match self.inner.active.get() {
			Some(active) => RouteScope::new(active.route.id(), self.clone()).render(),
			None => Ok(fallback()),
		}
	}

	/// Creates a link resolved against this scope's base.
	pub fn link(&self, config: LinkConfig) -> Link {
		Link::new(self.clone(), config)
	}

	/// Navigates through the shared history.
	pub fn navigate(&self, to: &str, options: NavigateOptions) {
		self.inner.tree.history.navigate(to, options);
	}

	/// Changes the base path of the root scope.
	pub fn set_basepath(&self, basepath: &str) -> RouterResult<()> {
		let Some(root_base) = &self.inner.root_base else {
			return Err(RouterError::NotRootScope);
		};
		validate_basepath(basepath)?;
		tracing::debug!(basepath, "root basepath changed");
		root_base.set(Base::new(basepath));
		Ok(())
	}

	/// Tears down this scope's subscriptions. Unmounting the root also stops
	/// listening to the history.
	pub fn unmount(&self) {
		let subscriptions: Vec<Subscription> =
			self.inner.subscriptions.borrow_mut().drain(..).collect();
		for subscription in subscriptions {
			subscription.unsubscribe();
		}
		if self.is_root() {
			if let Some(unlisten) = self.inner.tree.unlisten.borrow_mut().take() {
				unlisten.unlisten();
				tracing::debug!("root router stopped listening to history");
			}
		}
	}
}

impl fmt::Debug for RouterScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterScope")
			.field("root", &self.is_root())
			.field("mode", &self.mode())
			.field("base", &self.inner.base.get())
			.field("routes", &self.inner.routes.get().len())
			.finish()
	}
}
