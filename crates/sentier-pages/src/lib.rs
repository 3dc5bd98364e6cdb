//! Sentier Pages - History Sources, Router Scopes and Links
//!
//! The stateful half of the Sentier routing core, shared by server-side
//! rendering and the browser.
//!
//! ## Architecture
//!
//! - [`history`]: navigation over a live document or an in-memory entry log
//! - [`router`]: nested router scopes, route registration, active-route
//!   selection and link classification
//! - [`view`]: renderable output and the bound-view contract of routes
//! - [`config`]: root router configuration
//!
//! Ranking and matching live in `sentier-urls`; the stores that propagate
//! location and active-route changes live in `sentier-core`.
//!
//! ## Rendering Modes
//!
//! A router tree is either **live** (the active route follows navigation) or
//! **static** (one synchronous pass for server-side output, where the first
//! matching route wins). The mode is fixed when the root scope mounts; see
//! [`config::RenderMode`].
//!
//! ## Logging
//!
//! Events are emitted through `tracing`. The library never installs a
//! subscriber.

pub mod config;
pub mod history;
pub mod router;
pub mod view;

pub use config::{ConfigError, RenderMode, RouterConfig};
pub use history::{History, Location, NavigateOptions};
pub use router::{Link, LinkConfig, RouteConfig, RouteScope, RouterError, RouterScope};
pub use view::{IntoView, View};
