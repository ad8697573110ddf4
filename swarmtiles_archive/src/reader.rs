use crate::{ArchiveError, ArchiveHeader, TileArchive};
use anyhow::{Result, ensure};
use std::collections::BTreeMap;
use swarmtiles_core::{Blob, GeoBBox, GeoCenter, TileCoord3, TileType};

/// Normalized archive metadata, ready for TileJSON-style consumers.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchiveInfo {
	pub format: TileType,
	pub content_type: Option<&'static str>,
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub bounds: GeoBBox,
	pub center: GeoCenter,
	pub metadata: BTreeMap<String, String>,
}

/// Reads tiles and metadata through a [`TileArchive`] binding.
///
/// This layer owns the derivation rules for missing header fields and the
/// range checking of tile requests; the archive binding below it stays a
/// plain lookup.
#[derive(Debug)]
pub struct ArchiveReader {
	archive: Box<dyn TileArchive>,
}

impl ArchiveReader {
	pub fn new(archive: Box<dyn TileArchive>) -> Result<ArchiveReader> {
		let header = archive.header();
		ensure!(
			header.min_zoom <= header.max_zoom,
			"archive '{}' declares min zoom {} above max zoom {}",
			archive.source_name(),
			header.min_zoom,
			header.max_zoom
		);
		ensure!(
			header.max_zoom <= 31,
			"archive '{}' declares an unsupported max zoom {}",
			archive.source_name(),
			header.max_zoom
		);
		Ok(ArchiveReader { archive })
	}

	pub fn source_name(&self) -> &str {
		self.archive.source_name()
	}

	pub fn header(&self) -> &ArchiveHeader {
		self.archive.header()
	}

	/// Merges the embedded metadata with the header fields.
	///
	/// Derivations:
	/// - `bounds`: the header bounds when all four are present and non-zero,
	///   otherwise the full Web-Mercator extent.
	/// - `center`: the header center when a center zoom is present, otherwise
	///   the bounds midpoint at half the maximum zoom.
	pub async fn get_info(&self) -> Result<ArchiveInfo> {
		let header = self.archive.header();
		let bounds = normalized_bounds(header);
		let center = normalized_center(header, &bounds);
		Ok(ArchiveInfo {
			format: header.tile_type,
			content_type: header.tile_type.content_type(),
			min_zoom: header.min_zoom,
			max_zoom: header.max_zoom,
			bounds,
			center,
			metadata: self.archive.metadata().await?,
		})
	}

	/// Fetches one tile. `Ok(None)` is a gap inside the declared range;
	/// coordinates outside it fail with [`ArchiveError::OutOfRange`].
	pub async fn get_tile(&self, z: u8, x: u32, y: u32) -> Result<Option<Blob>> {
		let header = self.archive.header();
		let zoom_ok = z >= header.min_zoom && z <= header.max_zoom;
		// max_zoom <= 31 was checked at construction, the shift cannot overflow
		let side = 1u64 << z.min(header.max_zoom);
		if !zoom_ok || u64::from(x) >= side || u64::from(y) >= side {
			return Err(
				ArchiveError::OutOfRange {
					z,
					x,
					y,
					min_zoom: header.min_zoom,
					max_zoom: header.max_zoom,
				}
				.into(),
			);
		}
		self.archive.get_tile(&TileCoord3::new(x, y, z)?).await
	}

	pub async fn close(&self) -> Result<()> {
		self.archive.close().await
	}
}

fn normalized_bounds(header: &ArchiveHeader) -> GeoBBox {
	// a bound of exactly 0.0 counts as unset
	let explicit = |bound: Option<f64>| bound.filter(|value| *value != 0.0);
	match (
		explicit(header.min_lon),
		explicit(header.min_lat),
		explicit(header.max_lon),
		explicit(header.max_lat),
	) {
		(Some(x_min), Some(y_min), Some(x_max), Some(y_max)) => GeoBBox::new(x_min, y_min, x_max, y_max),
		_ => GeoBBox::WEB_MERCATOR,
	}
}

fn normalized_center(header: &ArchiveHeader, bounds: &GeoBBox) -> GeoCenter {
	match header.center_zoom {
		Some(zoom) => GeoCenter::new(header.center_lon, header.center_lat, zoom),
		None => GeoCenter::from_bbox(bounds, header.max_zoom),
	}
}
