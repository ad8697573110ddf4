use thiserror::Error;

/// Failures of the terrain pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TerrainError {
	/// The elevation encoding tag is not one of the supported names.
	#[error("unknown elevation encoding \"{name}\", expected \"mapbox\" or \"terrarium\"")]
	EncodingNotAllowed { name: String },
	/// The center tile of the 3x3 neighborhood could not be fetched or
	/// decoded. Neighbors may be absent, the center may not.
	#[error("the center tile of the raster neighborhood is missing")]
	MissingCenterTile,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_failure() {
		let error = TerrainError::EncodingNotAllowed {
			name: "gdal".to_string(),
		};
		assert_eq!(
			error.to_string(),
			"unknown elevation encoding \"gdal\", expected \"mapbox\" or \"terrarium\""
		);
		assert_eq!(
			TerrainError::MissingCenterTile.to_string(),
			"the center tile of the raster neighborhood is missing"
		);
	}

	#[test]
	fn downcast_through_anyhow() {
		let error: anyhow::Error = TerrainError::MissingCenterTile.into();
		assert!(error.downcast_ref::<TerrainError>().is_some());
	}
}
