use thiserror::Error;

/// Failures of the tile geometry encoder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
	/// The encoder was handed a geometry it cannot express as commands,
	/// e.g. an empty multi-geometry, an empty part or a degenerate ring.
	#[error("malformed geometry: {reason}")]
	MalformedGeometry { reason: String },
}

impl GeometryError {
	pub fn malformed(reason: impl Into<String>) -> GeometryError {
		GeometryError::MalformedGeometry { reason: reason.into() }
	}
}
