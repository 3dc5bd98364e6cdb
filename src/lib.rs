//! # Sentier
//!
//! The routing core of a server-rendered page framework: ranked path
//! matching, history sources and nested router scopes that stay in sync with
//! the current location.
//!
//! ## Feature Flags
//!
//! - `core` - reactive value stores ([`core`])
//! - `urls` - segment ranking, matching and path resolution ([`urls`])
//! - `pages` - history, router scopes, links and render dispatch ([`pages`])
//! - `full` (default) - everything
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "pages")]
//! # {
//! use sentier::pages::config::{RenderMode, RouterConfig};
//! use sentier::pages::router::{RouteConfig, RouterScope};
//! use sentier::pages::view::View;
//!
//! // Server-side pass: the first route that matches wins.
//! let router = RouterScope::builder(
//! 	RouterConfig::default()
//! 		.with_url("/blog/intro")
//! 		.with_mode(RenderMode::Static),
//! )
//! .history(sentier::pages::history::History::memory("/"))
//! .mount()
//! .unwrap();
//!
//! router.register_route(RouteConfig::new("/").view(|_| View::text("Home")));
//! router.register_route(RouteConfig::new("blog/*").view(|_| View::text("Blog")));
//!
//! let html = router.render_active(View::empty).unwrap().render_to_string();
//! assert_eq!(html, "Blog");
//! # }
//! ```

#[cfg(feature = "core")]
pub mod core;
#[cfg(feature = "pages")]
pub mod pages;
#[cfg(feature = "urls")]
pub mod urls;

#[cfg(feature = "pages")]
pub use pages::{History, Location, RouterConfig, RouterScope};
#[cfg(feature = "urls")]
pub use urls::{pick, resolve};
