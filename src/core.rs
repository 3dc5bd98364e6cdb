//! Reactive value stores.
//!
//! # Examples
//!
//! ```rust
//! # #[cfg(feature = "core")]
//! # {
//! use sentier::core::{Writable, derived};
//!
//! let count = Writable::new(1);
//! let doubled = derived(&count, |n: &i32| n * 2);
//! count.set(4);
//! assert_eq!(doubled.get(), 8);
//! # }
//! ```

#[cfg(feature = "core")]
pub use sentier_core::*;
