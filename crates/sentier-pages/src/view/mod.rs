//! Renderable output.
//!
//! Route views and links produce a [`View`]: a small markup tree that a
//! static render pass writes out as HTML through its [`fmt::Display`] impl.

mod bound;

pub use bound::{BoundView, RouteProps, RouteSlot, ViewFn, ViewRegistry};

use std::fmt;

/// Output of a route view, a link or a fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum View {
	Element(Element),
	Text(String),
	/// Sibling views without a wrapper.
	Fragment(Vec<View>),
	#[default]
	Empty,
}

/// A tag with attributes and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	tag: String,
	attrs: Vec<(String, String)>,
	content: Vec<View>,
}

impl Element {
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	pub fn child(mut self, child: impl IntoView) -> Self {
		self.content.push(child.into_view());
		self
	}

	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Value of the first attribute called `name`.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find_map(|(key, value)| (key == name).then_some(value.as_str()))
	}
}

impl View {
	pub fn element(tag: impl Into<String>) -> Element {
		Element {
			tag: tag.into(),
			attrs: Vec::new(),
			content: Vec::new(),
		}
	}

	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	pub fn empty() -> Self {
		Self::Empty
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Empty)
	}

	/// The view as an HTML string.
	pub fn render_to_string(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for View {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Element(element) => fmt::Display::fmt(element, f),
			Self::Text(text) => fmt::Display::fmt(&Escaped(text), f),
			Self::Fragment(views) => views
				.iter()
				.try_for_each(|view| fmt::Display::fmt(view, f)),
			Self::Empty => Ok(()),
		}
	}
}

impl fmt::Display for Element {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "<{}", self.tag)?;
		for (name, value) in &self.attrs {
			write!(f, " {name}=\"{}\"", Escaped(value))?;
		}
		f.write_str(">")?;
		for view in &self.content {
			fmt::Display::fmt(view, f)?;
		}
		write!(f, "</{}>", self.tag)
	}
}

/// Text written with the HTML-significant characters replaced by entities.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut rest = self.0;
		while let Some(at) = rest.find(['&', '<', '>', '"', '\'']) {
			f.write_str(&rest[..at])?;
			let entity = match rest.as_bytes()[at] {
				b'&' => "&amp;",
				b'<' => "&lt;",
				b'>' => "&gt;",
				b'"' => "&quot;",
				_ => "&#x27;",
			};
			f.write_str(entity)?;
			rest = &rest[at + 1..];
		}
		f.write_str(rest)
	}
}

/// Anything a view or a link can take as content.
pub trait IntoView {
	fn into_view(self) -> View;
}

impl IntoView for View {
	fn into_view(self) -> View {
		self
	}
}

impl IntoView for Element {
	fn into_view(self) -> View {
		View::Element(self)
	}
}

impl IntoView for String {
	fn into_view(self) -> View {
		View::Text(self)
	}
}

impl IntoView for &str {
	fn into_view(self) -> View {
		View::Text(self.to_string())
	}
}

impl<T: IntoView> IntoView for Option<T> {
	fn into_view(self) -> View {
		self.map_or(View::Empty, IntoView::into_view)
	}
}

impl<T: IntoView> IntoView for Vec<T> {
	fn into_view(self) -> View {
		View::Fragment(self.into_iter().map(IntoView::into_view).collect())
	}
}
