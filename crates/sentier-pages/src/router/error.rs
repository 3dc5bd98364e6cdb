//! Router errors.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Router errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RouterError {
	/// An active route names a view that is not registered.
	#[error("route view '{name}' is not registered")]
	InvalidView {
		/// The unresolved view name.
		name: String,
	},

	/// The operation is only valid on the outermost scope.
	#[error("operation requires the root router scope")]
	NotRootScope,

	/// Invalid configuration.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
