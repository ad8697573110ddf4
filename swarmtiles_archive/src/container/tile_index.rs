use anyhow::{Context, Result};
use std::collections::HashMap;
use swarmtiles_core::io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob};
use swarmtiles_core::{Blob, ByteRange, TileCoord3};

/// Maps tile coordinates to their byte ranges inside the container.
///
/// Serialized as a flat run of entries (zoom byte, then x, y, offset and
/// length as varints), sorted by coordinate so the same index always
/// produces the same bytes.
#[derive(Debug, Default, PartialEq)]
pub struct TileIndex {
	map: HashMap<TileCoord3, ByteRange>,
}

impl TileIndex {
	pub fn new() -> TileIndex {
		TileIndex { map: HashMap::new() }
	}

	pub fn add(&mut self, coord: TileCoord3, range: ByteRange) {
		self.map.insert(coord, range);
	}

	pub fn get(&self, coord: &TileCoord3) -> Option<&ByteRange> {
		self.map.get(coord)
	}

	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut entries: Vec<(&TileCoord3, &ByteRange)> = self.map.iter().collect();
		entries.sort_by_key(|(coord, _)| (coord.z, coord.x, coord.y));

		let mut writer = ValueWriterBlob::new_le();
		for (coord, range) in entries {
			writer.write_u8(coord.z)?;
			writer.write_varint(u64::from(coord.x))?;
			writer.write_varint(u64::from(coord.y))?;
			writer.write_varint(range.offset)?;
			writer.write_varint(range.length)?;
		}
		Ok(writer.into_blob())
	}

	pub fn from_blob(blob: &Blob) -> Result<TileIndex> {
		let mut reader = ValueReaderSlice::new_le(blob.as_slice());
		let mut index = TileIndex::new();
		while reader.has_remaining() {
			let z = reader.read_u8().context("Failed to read zoom of index entry")?;
			let x = reader.read_varint().context("Failed to read x of index entry")? as u32;
			let y = reader.read_varint().context("Failed to read y of index entry")? as u32;
			let offset = reader.read_varint().context("Failed to read offset of index entry")?;
			let length = reader.read_varint().context("Failed to read length of index entry")?;
			let coord = TileCoord3::new(x, y, z).context("Invalid coordinate in tile index")?;
			index.add(coord, ByteRange::new(offset, length));
		}
		Ok(index)
	}
}
