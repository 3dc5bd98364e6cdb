//! Router/Route/Link coordination.
//!
//! ## Scope Lifecycle
//!
//! - The root scope owns the shared location store. In [`RenderMode::Live`]
//!   it follows the history; in [`RenderMode::Static`] the location is fixed
//!   for the pass.
//! - Nested scopes share the location and take their base from the enclosing
//!   scope's child base.
//! - Routes register into their scope. Their absolute pattern is recombined
//!   whenever the scope's base changes.
//! - The active match is recomputed whenever the location or the route set
//!   changes (live mode), or fixed by the first route that matches when it
//!   registers (static mode).
//!
//! ## Example
//!
//! ```
//! use sentier_pages::config::{RenderMode, RouterConfig};
//! use sentier_pages::history::{History, NavigateOptions};
//! use sentier_pages::router::{LinkConfig, RouteConfig, RouterScope};
//! use sentier_pages::view::View;
//!
//! let router = RouterScope::builder(RouterConfig::default().with_mode(RenderMode::Live))
//! 	.history(History::memory("/"))
//! 	.mount()
//! 	.unwrap();
//!
//! let home = router.register_route(RouteConfig::new("/").view(|_| View::text("Home")));
//! let post = router.register_route(
//! 	RouteConfig::new("blog/:slug").view(|props| {
//! 		View::text(format!("Post {}", props.param("slug").unwrap_or_default()))
//! 	}),
//! );
//!
//! assert_eq!(home.render().unwrap().render_to_string(), "Home");
//!
//! router.navigate("/blog/hello", NavigateOptions::default());
//! assert!(!home.is_active());
//! assert_eq!(post.render().unwrap().render_to_string(), "Post hello");
//!
//! let link = router.link(LinkConfig::nav("blog/hello"));
//! assert_eq!(
//! 	link.render("Hello").render_to_string(),
//! 	"<a href=\"/blog/hello\" aria-current=\"page\" class=\"active\">Hello</a>"
//! );
//! ```
//!
//! [`RenderMode::Live`]: crate::config::RenderMode::Live
//! [`RenderMode::Static`]: crate::config::RenderMode::Static

mod error;
mod link;
mod route;
mod scope;

pub use error::{RouterError, RouterResult};
pub use link::{ExtraPropsFn, Link, LinkConfig, LinkState, nav_link_props};
pub use route::{ActiveMatch, Base, Route, RouteConfig, RouteId, RouteScope};
pub use scope::{RouterScope, RouterScopeBuilder};
