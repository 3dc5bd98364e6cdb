//! Path ranking, matching and resolution.
//!
//! # Examples
//!
//! ```rust
//! # #[cfg(feature = "urls")]
//! # {
//! use sentier::urls::{RouteDef, pick, resolve};
//!
//! let routes = vec![RouteDef::new("users/:id"), RouteDef::new("")];
//! assert_eq!(pick(&routes, "/users/7").unwrap().param("id"), Some("7"));
//! assert!(pick(&routes, "/nowhere").unwrap().route.is_default);
//! assert_eq!(resolve("../settings", "/users/7"), "/users/settings");
//! # }
//! ```

#[cfg(feature = "urls")]
pub use sentier_urls::*;
