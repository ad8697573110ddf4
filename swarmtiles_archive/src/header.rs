use swarmtiles_core::TileType;

/// Raw header fields of a tile archive, as the format binding parsed them.
///
/// Bounds and center fields carry whatever the archive stored, including the
/// zero placeholders some writers emit for unset fields. Normalization into
/// usable metadata happens in [`crate::ArchiveReader`], not here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArchiveHeader {
	pub tile_type: TileType,
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub min_lon: Option<f64>,
	pub min_lat: Option<f64>,
	pub max_lon: Option<f64>,
	pub max_lat: Option<f64>,
	pub center_lon: f64,
	pub center_lat: f64,
	pub center_zoom: Option<u8>,
}

impl ArchiveHeader {
	pub fn new(tile_type: TileType, min_zoom: u8, max_zoom: u8) -> ArchiveHeader {
		ArchiveHeader {
			tile_type,
			min_zoom,
			max_zoom,
			..ArchiveHeader::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_empty_unknown() {
		let header = ArchiveHeader::default();
		assert_eq!(header.tile_type, TileType::Unknown);
		assert_eq!(header.min_zoom, 0);
		assert_eq!(header.max_zoom, 0);
		assert_eq!(header.min_lon, None);
		assert_eq!(header.center_zoom, None);
	}

	#[test]
	fn new_sets_format_and_zoom_range() {
		let header = ArchiveHeader::new(TileType::Pbf, 2, 14);
		assert_eq!(header.tile_type, TileType::Pbf);
		assert_eq!(header.min_zoom, 2);
		assert_eq!(header.max_zoom, 14);
	}
}
