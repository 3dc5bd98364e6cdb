//! History backend errors.

use thiserror::Error;

/// Failures while creating a navigation entry.
///
/// These never escape [`History::navigate`](super::History::navigate): a
/// failed entry creation degrades to a whole-document navigation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
	/// The backend refused another entry.
	#[error("history entry limit of {limit} reached")]
	QuotaExceeded {
		/// Maximum number of entries the backend accepts.
		limit: usize,
	},

	/// The backend rejected the operation.
	#[error("history backend error: {0}")]
	Backend(String),

	/// The navigation state could not be serialized.
	#[error("failed to serialize history state: {0}")]
	Serialization(#[from] serde_json::Error),
}
