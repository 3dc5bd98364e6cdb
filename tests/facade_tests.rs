//! Facade re-export tests
//!
//! Exercise each feature module through the `sentier` facade.

use rstest::rstest;
use serde_json::json;

#[cfg(feature = "core")]
#[rstest]
fn test_core_stores_through_facade() {
	use sentier::core::{Writable, derived2};

	let base = Writable::new("/app".to_string());
	let page = Writable::new("intro".to_string());
	let href = derived2(&base, &page, |base: &String, page: &String| {
		format!("{base}/{page}")
	});

	page.set("video".to_string());
	assert_eq!(href.get(), "/app/video");
}

#[cfg(feature = "urls")]
#[rstest]
#[case("/blog/2024/hello", "blog/*")]
#[case("/blog/hello", "blog/:slug")]
#[case("/blog", "blog")]
fn test_urls_pick_through_facade(#[case] uri: &str, #[case] expected: &str) {
	use sentier::urls::RouteDef;

	let routes = vec![
		RouteDef::new("blog/*"),
		RouteDef::new("blog/:slug"),
		RouteDef::new("blog"),
	];
	assert_eq!(sentier::pick(&routes, uri).unwrap().route.path, expected);
}

#[cfg(feature = "pages")]
#[rstest]
fn test_pages_router_through_facade() {
	use sentier::pages::config::RenderMode;
	use sentier::pages::{NavigateOptions, RouteConfig, View};
	use sentier::{History, RouterConfig, RouterScope};

	let router = RouterScope::builder(RouterConfig::default().with_mode(RenderMode::Live))
		.history(History::memory("/"))
		.mount()
		.unwrap();
	let data = router.register_route(
		RouteConfig::new("retrieve-data")
			.prop("results", json!([1, 2]))
			.view(|props| View::text(format!("{}", props.get("results").unwrap_or_default()))),
	);

	router.navigate(
		"/retrieve-data",
		NavigateOptions::default().with_state(json!({ "source": "facade" })),
	);

	assert!(data.is_active());
	assert_eq!(data.render().unwrap().render_to_string(), "[1,2]");
	assert_eq!(router.location().get().state.unwrap()["source"], "facade");
}
