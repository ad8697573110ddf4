use std::fmt::Display;

/// The payload format of an archive's tiles.
///
/// Mirrors the tile type enumeration stored in archive headers. `Unknown`
/// has no canonical content type; every other variant does.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TileType {
	#[default]
	Unknown,
	Pbf,
	Png,
	Jpeg,
	Webp,
	Avif,
}

impl TileType {
	pub fn as_str(&self) -> &str {
		match self {
			TileType::Unknown => "unknown",
			TileType::Pbf => "pbf",
			TileType::Png => "png",
			TileType::Jpeg => "jpeg",
			TileType::Webp => "webp",
			TileType::Avif => "avif",
		}
	}

	/// The canonical content type, or `None` for [`TileType::Unknown`].
	pub fn content_type(&self) -> Option<&'static str> {
		match self {
			TileType::Unknown => None,
			TileType::Pbf => Some("vnd.mapbox-vector-tile"),
			TileType::Png => Some("image/png"),
			TileType::Jpeg => Some("image/jpeg"),
			TileType::Webp => Some("image/webp"),
			TileType::Avif => Some("image/avif"),
		}
	}
}

impl Display for TileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(TileType::Unknown, "unknown", None)]
	#[case(TileType::Pbf, "pbf", Some("vnd.mapbox-vector-tile"))]
	#[case(TileType::Png, "png", Some("image/png"))]
	#[case(TileType::Jpeg, "jpeg", Some("image/jpeg"))]
	#[case(TileType::Webp, "webp", Some("image/webp"))]
	#[case(TileType::Avif, "avif", Some("image/avif"))]
	fn names_and_content_types(
		#[case] tile_type: TileType,
		#[case] name: &str,
		#[case] content_type: Option<&str>,
	) {
		assert_eq!(tile_type.to_string(), name);
		assert_eq!(tile_type.content_type(), content_type);
	}
}
