use thiserror::Error;

/// Failure classes of byte-range sources.
///
/// Carried inside `anyhow::Error`; callers that need to distinguish classes
/// use `downcast_ref::<SourceError>()`.
#[derive(Debug, Error)]
pub enum SourceError {
	/// Opening or connecting failed: missing file, unreachable endpoint,
	/// failed swarm join.
	#[error("source unavailable: {0}")]
	SourceUnavailable(String),

	/// A required torrent piece could not be retrieved. The whole read
	/// fails; no partial result is returned.
	#[error("piece {index} unavailable: {reason}")]
	PieceUnavailable { index: u64, reason: String },

	/// The source was closed; it will not serve further reads.
	#[error("source '{0}' is closed")]
	SourceClosed(String),
}
