//! Views bound to routes.

use core::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::View;
use crate::history::Location;

/// A route component.
pub type ViewFn = Rc<dyn Fn(&RouteProps) -> View>;

/// Props passed to a bound view: `{ location, ...params, ...extra }`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteProps {
	pub location: Location,
	pub params: HashMap<String, String>,
	/// Per-route props, passed through untouched.
	pub extra: Map<String, Value>,
}

impl RouteProps {
	/// Looks up a prop the way a spread `{ location, ...params, ...extra }`
	/// would: extra props shadow params, which shadow `location`.
	pub fn get(&self, key: &str) -> Option<Value> {
		if let Some(value) = self.extra.get(key) {
			return Some(value.clone());
		}
		if let Some(value) = self.params.get(key) {
			return Some(Value::String(value.clone()));
		}
		if key == "location" {
			return serde_json::to_value(&self.location).ok();
		}
		None
	}

	/// Returns a path parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}
}

/// What an active route without a bound view exposes to its nested content.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSlot {
	pub params: HashMap<String, String>,
	pub location: Location,
}

/// The view a route renders when active.
#[derive(Clone)]
pub enum BoundView {
	/// A component function.
	Component(ViewFn),
	/// A component registered by name in the tree's [`ViewRegistry`].
	Named(String),
}

impl BoundView {
	pub fn component<F>(f: F) -> Self
	where
		F: Fn(&RouteProps) -> View + 'static,
	{
		Self::Component(Rc::new(f))
	}

	pub fn named(name: impl Into<String>) -> Self {
		Self::Named(name.into())
	}
}

impl fmt::Debug for BoundView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Component(_) => f.write_str("Component(..)"),
			Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
		}
	}
}

/// Named route components shared by a router tree.
#[derive(Clone, Default)]
pub struct ViewRegistry {
	views: Rc<RefCell<HashMap<String, ViewFn>>>,
}

impl ViewRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers (or replaces) a named component.
	pub fn register<F>(&self, name: impl Into<String>, f: F)
	where
		F: Fn(&RouteProps) -> View + 'static,
	{
		self.views.borrow_mut().insert(name.into(), Rc::new(f));
	}

	pub fn resolve(&self, name: &str) -> Option<ViewFn> {
		self.views.borrow().get(name).cloned()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.views.borrow().contains_key(name)
	}
}

impl fmt::Debug for ViewRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<String> = self.views.borrow().keys().cloned().collect();
		names.sort();
		f.debug_struct("ViewRegistry").field("views", &names).finish()
	}
}
