//! Best-match selection with parameter extraction.

use std::collections::HashMap;

use crate::rank::{RoutePattern, rank_routes};
use crate::segment::{Segment, segmentize};

/// A route matched against a pathname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch<'a, R> {
	/// The matched route.
	pub route: &'a R,
	/// Captured parameters, URL-decoded.
	pub params: HashMap<String, String>,
	/// The absolute path prefix consumed by the match.
	pub uri: String,
}

impl<'a, R> PathMatch<'a, R> {
	/// Returns a captured parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}
}

fn decode(segment: &str) -> String {
	urlencoding::decode(segment)
		.map(|decoded| decoded.into_owned())
		.unwrap_or_else(|_| segment.to_string())
}

/// Matches one non-default route against pathname segments.
///
/// Returns the captured parameters and the number of segments consumed.
fn match_segments(
	pattern: &str,
	uri_segments: &[&str],
	is_root_uri: bool,
) -> Option<(HashMap<String, String>, usize)> {
	let route_segments = segmentize(pattern);
	let mut params = HashMap::new();
	let max = route_segments.len().max(uri_segments.len());

	for index in 0..max {
		let route_segment = route_segments.get(index).copied();
		let uri_segment = uri_segments.get(index).copied();

		if let Some(Segment::Splat(name)) = route_segment.map(Segment::classify) {
			let rest: Vec<String> = uri_segments[index.min(uri_segments.len())..]
				.iter()
				.map(|segment| decode(segment))
				.collect();
			params.insert(name.to_string(), rest.join("/"));
			return Some((params, uri_segments.len()));
		}

		let uri_segment = uri_segment?;
		match route_segment.map(Segment::classify) {
			Some(Segment::Dynamic(name)) if !is_root_uri => {
				params.insert(name.to_string(), decode(uri_segment));
			}
			_ if route_segment != Some(uri_segment) => return None,
			_ => {}
		}
	}

	Some((params, max))
}

/// Selects the best route for `uri`.
///
/// Routes are walked in rank order. The first non-default route whose
/// segments all match wins; otherwise the first default route is returned
/// with empty params and the full requested `uri`; otherwise `None`. Any
/// `?query` suffix is ignored for matching.
///
/// ```
/// use sentier_urls::{RouteDef, pick};
///
/// let routes = vec![RouteDef::new("users/:id"), RouteDef::new("users/new")];
///
/// let matched = pick(&routes, "/users/42").unwrap();
/// assert_eq!(matched.route.path, "users/:id");
/// assert_eq!(matched.param("id"), Some("42"));
///
/// let matched = pick(&routes, "/users/new").unwrap();
/// assert_eq!(matched.route.path, "users/new");
/// ```
pub fn pick<'a, R: RoutePattern>(routes: &'a [R], uri: &str) -> Option<PathMatch<'a, R>> {
	let pathname = uri.split('?').next().unwrap_or_default();
	let uri_segments = segmentize(pathname);
	let is_root_uri = uri_segments.first().is_some_and(|segment| segment.is_empty());

	let mut fallback = None;
	for ranked in rank_routes(routes) {
		let route = ranked.route;
		if route.is_default() {
			if fallback.is_none() {
				fallback = Some(PathMatch {
					route,
					params: HashMap::new(),
					uri: uri.to_string(),
				});
			}
			continue;
		}

		if let Some((params, consumed)) =
			match_segments(route.pattern(), &uri_segments, is_root_uri)
		{
			return Some(PathMatch {
				route,
				params,
				uri: format!("/{}", uri_segments[..consumed].join("/")),
			});
		}
	}

	fallback
}

/// Matches a single route against `uri`.
///
/// A default route always matches.
pub fn match_route<'a, R: RoutePattern>(route: &'a R, uri: &str) -> Option<PathMatch<'a, R>> {
	pick(core::slice::from_ref(route), uri)
}
