//! Property tests for route ranking and matching
//!
//! Verifies that:
//! 1. Matching is deterministic for identical inputs
//! 2. Ranking is stable across repeated calls
//! 3. At any position, static outranks dynamic, which outranks splat

use proptest::prelude::*;
use rstest::rstest;
use sentier_urls::{RouteDef, pick, rank_route, rank_routes, resolve};

fn segment() -> impl Strategy<Value = String> {
	prop_oneof![
		"[a-z]{1,6}",
		"[a-z]{1,4}".prop_map(|name| format!(":{name}")),
		Just("*".to_string()),
	]
}

fn pattern() -> impl Strategy<Value = String> {
	proptest::collection::vec(segment(), 0..5).prop_map(|segments| segments.join("/"))
}

fn pathname() -> impl Strategy<Value = String> {
	proptest::collection::vec("[a-z0-9]{1,6}", 0..6)
		.prop_map(|segments| format!("/{}", segments.join("/")))
}

proptest! {
	#[test]
	fn prop_pick_is_deterministic(
		patterns in proptest::collection::vec(pattern(), 1..8),
		uri in pathname(),
	) {
		let routes: Vec<RouteDef> = patterns.into_iter().map(RouteDef::new).collect();

		let first = pick(&routes, &uri);
		let second = pick(&routes, &uri);

		prop_assert_eq!(first, second);
	}

	#[test]
	fn prop_rank_is_stable(patterns in proptest::collection::vec(pattern(), 0..10)) {
		let routes: Vec<RouteDef> = patterns.into_iter().map(RouteDef::new).collect();

		let first: Vec<usize> = rank_routes(&routes).iter().map(|r| r.index).collect();
		let second: Vec<usize> = rank_routes(&routes).iter().map(|r| r.index).collect();

		prop_assert_eq!(&first, &second);
		let scores: Vec<i32> = rank_routes(&routes).iter().map(|r| r.score).collect();
		prop_assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
	}

	#[test]
	fn prop_segment_kind_ordering(
		prefix in proptest::collection::vec("[a-z]{1,5}", 0..3),
		suffix in proptest::collection::vec("[a-z]{1,5}", 0..3),
		name in "[a-z]{1,5}",
	) {
		let build = |middle: &str| {
			let mut parts: Vec<&str> = prefix.iter().map(String::as_str).collect();
			parts.push(middle);
			parts.extend(suffix.iter().map(String::as_str));
			RouteDef::new(parts.join("/"))
		};
		let dynamic = format!(":{name}");

		let static_score = rank_route(&build(&name));
		let dynamic_score = rank_route(&build(&dynamic));
		let splat_score = rank_route(&build("*"));

		prop_assert!(static_score > dynamic_score);
		prop_assert!(dynamic_score > splat_score);
	}

	#[test]
	fn prop_parent_of_appended_segment_is_base(
		base in proptest::collection::vec("[a-z]{1,5}", 1..4),
		child in "[a-z]{1,5}",
	) {
		let base = format!("/{}", base.join("/"));
		let resolved = resolve(&child, &base);
		prop_assert_eq!(resolve("..", &resolved), base);
	}
}

#[rstest]
fn test_registration_order_does_not_affect_winner() {
	let forward = vec![
		RouteDef::new("users/*"),
		RouteDef::new("users/:id"),
		RouteDef::new("users/me"),
	];
	let reversed: Vec<RouteDef> = forward.iter().rev().cloned().collect();

	for uri in ["/users/me", "/users/7", "/users/7/posts"] {
		let a = pick(&forward, uri).map(|m| m.route.path.clone());
		let b = pick(&reversed, uri).map(|m| m.route.path.clone());
		assert_eq!(a, b, "winner differs for {uri}");
	}
}
