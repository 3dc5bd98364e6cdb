//! Router configuration.
//!
//! The root router scope is configured with a base path and, for rendering
//! contexts without a live document, an explicit initial URL.
//!
//! ```
//! use sentier_pages::config::{RenderMode, RouterConfig};
//!
//! let config = RouterConfig::from_toml_str(
//! 	r#"
//! basepath = "/app"
//! url = "/app/blog/hello"
//! mode = "static"
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.basepath, "/app");
//! assert_eq!(config.mode, Some(RenderMode::Static));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
	/// The TOML document could not be parsed.
	#[error("failed to parse router config: {0}")]
	Parse(#[from] toml::de::Error),

	/// The base path does not start with `/`.
	#[error("invalid basepath '{0}': must start with '/'")]
	InvalidBasepath(String),
}

/// How a router tree selects its active routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
	/// A live document: every route is registered and the active route is
	/// recomputed whenever the location or the route set changes.
	Live,
	/// A single synchronous pass without a live document: the first route
	/// that matches when it registers becomes active.
	Static,
}

impl RenderMode {
	/// `Live` when a browser window is available, `Static` otherwise.
	pub fn detect() -> Self {
		#[cfg(target_arch = "wasm32")]
		{
			if web_sys::window().is_some() {
				return Self::Live;
			}
		}
		Self::Static
	}
}

fn default_basepath() -> String {
	"/".to_string()
}

/// Root router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
	/// Base path of the outermost scope.
	#[serde(default = "default_basepath")]
	pub basepath: String,
	/// Forces the initial location (server-side rendering).
	#[serde(default)]
	pub url: Option<String>,
	/// Render mode; detected from the environment when unset.
	#[serde(default)]
	pub mode: Option<RenderMode>,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			basepath: default_basepath(),
			url: None,
			mode: None,
		}
	}
}

impl RouterConfig {
	/// Parses a configuration from TOML and validates it.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	pub fn with_basepath(mut self, basepath: impl Into<String>) -> Self {
		self.basepath = basepath.into();
		self
	}

	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());
		self
	}

	pub fn with_mode(mut self, mode: RenderMode) -> Self {
		self.mode = Some(mode);
		self
	}

	/// Checks that the base path is absolute.
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_basepath(&self.basepath)
	}

	/// The configured mode, or the detected one.
	pub fn resolved_mode(&self) -> RenderMode {
		self.mode.unwrap_or_else(RenderMode::detect)
	}
}

pub(crate) fn validate_basepath(basepath: &str) -> Result<(), ConfigError> {
	if basepath.starts_with('/') {
		Ok(())
	} else {
		Err(ConfigError::InvalidBasepath(basepath.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let config = RouterConfig::default();
		assert_eq!(config.basepath, "/");
		assert!(config.url.is_none());
		assert!(config.mode.is_none());
	}

	#[rstest]
	fn test_empty_toml_uses_defaults() {
		let config = RouterConfig::from_toml_str("").unwrap();
		assert_eq!(config, RouterConfig::default());
	}

	#[rstest]
	fn test_builder_methods() {
		let config = RouterConfig::default()
			.with_basepath("/admin")
			.with_url("/admin/users")
			.with_mode(RenderMode::Live);

		assert_eq!(config.basepath, "/admin");
		assert_eq!(config.url.as_deref(), Some("/admin/users"));
		assert_eq!(config.resolved_mode(), RenderMode::Live);
	}

	#[rstest]
	#[case("/", true)]
	#[case("/app", true)]
	#[case("app", false)]
	#[case("", false)]
	fn test_validate_basepath(#[case] basepath: &str, #[case] valid: bool) {
		let config = RouterConfig::default().with_basepath(basepath);
		assert_eq!(config.validate().is_ok(), valid);
	}

	#[rstest]
	fn test_invalid_basepath_in_toml() {
		let error = RouterConfig::from_toml_str("basepath = \"app\"").unwrap_err();
		assert!(matches!(error, ConfigError::InvalidBasepath(path) if path == "app"));
	}

	#[rstest]
	fn test_malformed_toml() {
		let error = RouterConfig::from_toml_str("basepath = ").unwrap_err();
		assert!(matches!(error, ConfigError::Parse(_)));
	}

	#[rstest]
	#[cfg(not(target_arch = "wasm32"))]
	fn test_detect_without_window_is_static() {
		assert_eq!(RenderMode::detect(), RenderMode::Static);
	}
}
