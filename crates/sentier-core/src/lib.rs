//! Sentier Core - Reactive Value Stores
//!
//! Minimal publish/subscribe stores used by the Sentier router to share
//! location, base and active-route state between a router scope, its routes
//! and its links.
//!
//! ## Features
//!
//! - **Writable stores**: [`Writable`] with NaN-safe change detection by default
//! - **Read-only views**: [`ReadStore`] and the [`Readable`] conversion trait
//! - **Start/stop notifiers**: lazily connect an external source while subscribed
//! - **Derived stores**: [`derived`], [`derived2`] and [`derived_all`], glitch-free
//!   across diamond-shaped dependencies
//!
//! ## Notification Order
//!
//! Notifications are delivered through a single thread-local queue. A `set`
//! performed while notifications are already being delivered is appended to
//! the queue rather than delivered recursively, so every subscriber observes
//! values in the order they were set.
//!
//! All stores are single-threaded (`Rc`-based), like the rest of the
//! rendering pipeline.

mod derive;
mod queue;
pub mod store;

pub use derive::{derived, derived_all, derived2};
pub use store::{
	EqFn, ReadStore, Readable, Setter, StopFn, Subscription, Writable, get, safe_eq,
};
