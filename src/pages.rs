//! History sources, router scopes, links and render dispatch.
//!
//! ## Architecture
//!
//! - **History**: browser History API on wasm32, in-memory entry log elsewhere
//! - **Router scopes**: nested scopes sharing one location store
//! - **Routes**: ranked, rebased on base changes, rendered when active
//! - **Links**: resolved against the scope base, classified as current or
//!   partially current

// Re-export all sentier-pages functionality
pub use sentier_pages::*;
