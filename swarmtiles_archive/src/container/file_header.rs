use crate::ArchiveHeader;
use anyhow::{Result, bail, ensure};
use swarmtiles_core::io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob};
use swarmtiles_core::{Blob, ByteRange, TileType};

pub const HEADER_LENGTH: u64 = 99;
const MAGIC: &[u8; 14] = b"swarmtiles_v01";

const FLAG_BOUNDS: u8 = 0b0000_0001;
const FLAG_CENTER_ZOOM: u8 = 0b0000_0010;

/// The fixed-length header at the front of a swarmtiles container.
///
/// Layout (big-endian): magic word, tile type byte, flags byte, zoom range,
/// bounds (4 x f64), center (2 x f64 plus zoom byte), metadata range, index
/// range. Unset bounds and center zoom are written as zeros and marked absent
/// in the flags byte.
#[derive(Debug, PartialEq)]
pub struct FileHeader {
	pub tile_type: TileType,
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub bounds: Option<[f64; 4]>,
	pub center_lon: f64,
	pub center_lat: f64,
	pub center_zoom: Option<u8>,
	pub meta_range: ByteRange,
	pub index_range: ByteRange,
}

impl FileHeader {
	pub fn new(tile_type: TileType, min_zoom: u8, max_zoom: u8) -> Result<FileHeader> {
		ensure!(
			min_zoom <= max_zoom,
			"min_zoom ({min_zoom}) must be <= max_zoom ({max_zoom})"
		);
		ensure!(max_zoom <= 31, "max_zoom ({max_zoom}) must be <= 31");
		Ok(FileHeader {
			tile_type,
			min_zoom,
			max_zoom,
			bounds: None,
			center_lon: 0.0,
			center_lat: 0.0,
			center_zoom: None,
			meta_range: ByteRange::empty(),
			index_range: ByteRange::empty(),
		})
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_be();
		writer.write_slice(MAGIC)?;

		writer.write_u8(match self.tile_type {
			TileType::Unknown => 0x00,
			TileType::Png => 0x10,
			TileType::Jpeg => 0x11,
			TileType::Webp => 0x12,
			TileType::Avif => 0x13,
			TileType::Pbf => 0x20,
		})?;

		let mut flags = 0u8;
		if self.bounds.is_some() {
			flags |= FLAG_BOUNDS;
		}
		if self.center_zoom.is_some() {
			flags |= FLAG_CENTER_ZOOM;
		}
		writer.write_u8(flags)?;

		writer.write_u8(self.min_zoom)?;
		writer.write_u8(self.max_zoom)?;

		for value in self.bounds.unwrap_or_default() {
			writer.write_f64(value)?;
		}
		writer.write_f64(self.center_lon)?;
		writer.write_f64(self.center_lat)?;
		writer.write_u8(self.center_zoom.unwrap_or_default())?;

		writer.write_range(&self.meta_range)?;
		writer.write_range(&self.index_range)?;

		if writer.position()? != HEADER_LENGTH {
			bail!(
				"header should be {HEADER_LENGTH} bytes long, but is {} bytes long",
				writer.position()?
			);
		}

		Ok(writer.into_blob())
	}

	pub fn from_blob(blob: &Blob) -> Result<FileHeader> {
		if blob.len() != HEADER_LENGTH {
			bail!("'{blob:?}' is not a valid swarmtiles header. A header is {HEADER_LENGTH} bytes long.");
		}

		let mut reader = ValueReaderSlice::new_be(blob.as_slice());
		let magic_word = reader.read_string(MAGIC.len() as u64)?;
		if &magic_word != "swarmtiles_v01" {
			bail!("'{blob:?}' is not a valid swarmtiles header. A header starts with 'swarmtiles_v01'.");
		}

		let tile_type = match reader.read_u8()? {
			0x00 => TileType::Unknown,
			0x10 => TileType::Png,
			0x11 => TileType::Jpeg,
			0x12 => TileType::Webp,
			0x13 => TileType::Avif,
			0x20 => TileType::Pbf,
			value => bail!("unknown tile type value: {value}"),
		};

		let flags = reader.read_u8()?;
		let min_zoom = reader.read_u8()?;
		let max_zoom = reader.read_u8()?;

		let bounds_values = [
			reader.read_f64()?,
			reader.read_f64()?,
			reader.read_f64()?,
			reader.read_f64()?,
		];
		let center_lon = reader.read_f64()?;
		let center_lat = reader.read_f64()?;
		let center_zoom_value = reader.read_u8()?;

		let mut header = FileHeader::new(tile_type, min_zoom, max_zoom)?;
		if flags & FLAG_BOUNDS != 0 {
			header.bounds = Some(bounds_values);
		}
		header.center_lon = center_lon;
		header.center_lat = center_lat;
		if flags & FLAG_CENTER_ZOOM != 0 {
			header.center_zoom = Some(center_zoom_value);
		}
		header.meta_range = reader.read_range()?;
		header.index_range = reader.read_range()?;

		Ok(header)
	}

	/// The header as a format-independent [`ArchiveHeader`].
	pub fn as_archive_header(&self) -> ArchiveHeader {
		ArchiveHeader {
			tile_type: self.tile_type,
			min_zoom: self.min_zoom,
			max_zoom: self.max_zoom,
			min_lon: self.bounds.map(|b| b[0]),
			min_lat: self.bounds.map(|b| b[1]),
			max_lon: self.bounds.map(|b| b[2]),
			max_lat: self.bounds.map(|b| b[3]),
			center_lon: self.center_lon,
			center_lat: self.center_lat,
			center_zoom: self.center_zoom,
		}
	}
}
