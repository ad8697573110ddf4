use super::{FileHeader, HEADER_LENGTH, TileIndex, encode_metadata};
use anyhow::{Context, Result};
use std::{collections::BTreeMap, path::Path};
use swarmtiles_core::io::{ValueWriter, ValueWriterBlob};
use swarmtiles_core::{Blob, ByteRange, TileCoord3, TileType};

/// Assembles a swarmtiles container: header, tile payloads, metadata, index.
///
/// Tiles are laid out in the order they were added; the index at the back
/// records their byte ranges.
#[derive(Debug)]
pub struct SwarmArchiveWriter {
	tile_type: TileType,
	min_zoom: u8,
	max_zoom: u8,
	bounds: Option<[f64; 4]>,
	center: Option<(f64, f64, u8)>,
	metadata: BTreeMap<String, String>,
	tiles: Vec<(TileCoord3, Blob)>,
}

impl SwarmArchiveWriter {
	pub fn new(tile_type: TileType, min_zoom: u8, max_zoom: u8) -> SwarmArchiveWriter {
		SwarmArchiveWriter {
			tile_type,
			min_zoom,
			max_zoom,
			bounds: None,
			center: None,
			metadata: BTreeMap::new(),
			tiles: Vec::new(),
		}
	}

	/// Geographic coverage as `[min_lon, min_lat, max_lon, max_lat]`.
	pub fn set_bounds(&mut self, bounds: [f64; 4]) {
		self.bounds = Some(bounds);
	}

	pub fn set_center(&mut self, lon: f64, lat: f64, zoom: u8) {
		self.center = Some((lon, lat, zoom));
	}

	pub fn set_metadata(&mut self, key: &str, value: &str) {
		self.metadata.insert(key.to_string(), value.to_string());
	}

	pub fn add_tile(&mut self, coord: TileCoord3, tile: Blob) {
		self.tiles.push((coord, tile));
	}

	pub fn into_blob(self) -> Result<Blob> {
		let mut header = FileHeader::new(self.tile_type, self.min_zoom, self.max_zoom)?;
		header.bounds = self.bounds;
		if let Some((lon, lat, zoom)) = self.center {
			header.center_lon = lon;
			header.center_lat = lat;
			header.center_zoom = Some(zoom);
		}

		let mut body = ValueWriterBlob::new_be();
		let mut index = TileIndex::new();
		for (coord, tile) in &self.tiles {
			index.add(*coord, ByteRange::new(HEADER_LENGTH + body.position()?, tile.len()));
			body.write_blob(tile)?;
		}

		let meta_blob = encode_metadata(&self.metadata)?;
		header.meta_range = ByteRange::new(HEADER_LENGTH + body.position()?, meta_blob.len());
		body.write_blob(&meta_blob)?;

		let index_blob = index.to_blob()?;
		header.index_range = ByteRange::new(HEADER_LENGTH + body.position()?, index_blob.len());
		body.write_blob(&index_blob)?;

		let mut output = ValueWriterBlob::new_be();
		output.write_blob(&header.to_blob()?)?;
		output.write_blob(&body.into_blob())?;
		Ok(output.into_blob())
	}

	pub fn write_path(self, path: &Path) -> Result<()> {
		let blob = self.into_blob()?;
		std::fs::write(path, blob.as_slice()).with_context(|| format!("Failed to write archive to {path:?}"))
	}
}
