//! Sentier URLs - Path Ranking, Matching and Resolution
//!
//! Pure functions over path strings, shared by server-side and in-browser
//! routing.
//!
//! ## Pattern Syntax
//!
//! - `about` - static segment
//! - `users/:id` - dynamic segment, captures one pathname segment
//! - `files/*` / `files/*path` - splat, captures every remaining segment
//! - `` (empty) - default route, chosen only when nothing else matches
//!
//! ## Ranking
//!
//! Every segment scores `SEGMENT_POINTS` plus a bonus by kind: static `+3`,
//! dynamic `+2`, root `+1`. A splat cancels its base score and subtracts a
//! further point. Routes are tried in descending score order, so callers never
//! need to order route registrations by hand.
//!
//! ```
//! use sentier_urls::{RouteDef, pick};
//!
//! let routes = vec![
//! 	RouteDef::new("blog/*"),
//! 	RouteDef::new("blog/:slug"),
//! 	RouteDef::new("blog/archive"),
//! ];
//!
//! assert_eq!(pick(&routes, "/blog/archive").unwrap().route.path, "blog/archive");
//! assert_eq!(pick(&routes, "/blog/hello").unwrap().route.path, "blog/:slug");
//! assert_eq!(pick(&routes, "/blog/2024/01").unwrap().route.path, "blog/*");
//! ```

mod pick;
mod rank;
mod resolve;
mod segment;

pub use pick::{PathMatch, match_route, pick};
pub use rank::{RankedRoute, RouteDef, RoutePattern, rank_route, rank_routes};
pub use resolve::{combine_paths, resolve, starts_with};
pub use segment::{
	DYNAMIC_POINTS, ROOT_POINTS, SEGMENT_POINTS, SPLAT_PENALTY, STATIC_POINTS, Segment,
	segmentize, strip_slashes,
};
