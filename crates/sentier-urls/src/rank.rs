//! Route specificity ranking.

use crate::segment::{Segment, segmentize};

/// A route that can be ranked and matched.
///
/// Implemented by the router's own route values; ranking and matching only
/// ever read the pattern and the default flag.
pub trait RoutePattern {
	/// The absolute route pattern, e.g. `blog/:slug/`.
	fn pattern(&self) -> &str;

	/// `true` for a fallback route registered with an empty pattern.
	fn is_default(&self) -> bool;
}

impl<R: RoutePattern + ?Sized> RoutePattern for &R {
	fn pattern(&self) -> &str {
		(**self).pattern()
	}

	fn is_default(&self) -> bool {
		(**self).is_default()
	}
}

/// A plain route definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteDef {
	pub path: String,
	pub is_default: bool,
}

impl RouteDef {
	/// Creates a route definition; an empty path makes it the default route.
	pub fn new(path: impl Into<String>) -> Self {
		let path = path.into();
		let is_default = path.is_empty();
		Self { path, is_default }
	}
}

impl RoutePattern for RouteDef {
	fn pattern(&self) -> &str {
		&self.path
	}

	fn is_default(&self) -> bool {
		self.is_default
	}
}

/// A route together with its score and registration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedRoute<'a, R> {
	pub route: &'a R,
	pub score: i32,
	pub index: usize,
}

/// Computes a route's specificity score. Default routes score 0.
///
/// ```
/// use sentier_urls::{RouteDef, rank_route};
///
/// assert_eq!(rank_route(&RouteDef::new("users/:id")), 13);
/// assert_eq!(rank_route(&RouteDef::new("")), 0);
/// ```
pub fn rank_route<R: RoutePattern + ?Sized>(route: &R) -> i32 {
	if route.is_default() {
		return 0;
	}
	segmentize(route.pattern())
		.into_iter()
		.map(|segment| Segment::classify(segment).points())
		.sum()
}

/// Ranks routes by descending score; equal scores keep registration order.
pub fn rank_routes<R: RoutePattern>(routes: &[R]) -> Vec<RankedRoute<'_, R>> {
	let mut ranked: Vec<_> = routes
		.iter()
		.enumerate()
		.map(|(index, route)| RankedRoute {
			route,
			score: rank_route(route),
			index,
		})
		.collect();
	// Stable sort: ties stay in registration order.
	ranked.sort_by(|a, b| b.score.cmp(&a.score));
	ranked
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn defs(paths: &[&str]) -> Vec<RouteDef> {
		paths.iter().map(|p| RouteDef::new(*p)).collect()
	}

	#[rstest]
	#[case("/", 5)]
	#[case("about", 7)]
	#[case("blog/*", 6)]
	#[case("users/:id/profile", 20)]
	#[case("*", -1)]
	fn test_rank_route(#[case] path: &str, #[case] expected: i32) {
		assert_eq!(rank_route(&RouteDef::new(path)), expected);
	}

	#[rstest]
	fn test_static_beats_dynamic_beats_splat() {
		let routes = defs(&["users/*", "users/:id", "users/new"]);
		let order: Vec<_> = rank_routes(&routes)
			.iter()
			.map(|r| r.route.path.as_str())
			.collect();
		assert_eq!(order, vec!["users/new", "users/:id", "users/*"]);
	}

	#[rstest]
	fn test_ties_keep_registration_order() {
		let routes = defs(&["b", "a", "c"]);
		let order: Vec<_> = rank_routes(&routes).iter().map(|r| r.index).collect();
		assert_eq!(order, vec![0, 1, 2]);
	}

	#[rstest]
	fn test_default_ranks_zero_regardless_of_pattern() {
		let route = RouteDef {
			path: "very/specific/path".to_string(),
			is_default: true,
		};
		assert_eq!(rank_route(&route), 0);
	}
}
