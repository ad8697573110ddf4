use super::{FileHeader, HEADER_LENGTH, TileIndex, decode_metadata};
use crate::{ArchiveHeader, TileArchive};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{collections::BTreeMap, path::Path};
use swarmtiles_core::{Blob, ByteRange, TileCoord3};
use swarmtiles_source::ByteRangeSource;

/// A swarmtiles container opened over a [`ByteRangeSource`].
///
/// Header, metadata and tile index are read once at open; tile payloads are
/// fetched per request through the source, so the same code path serves
/// local files, HTTP endpoints and swarms.
#[derive(Debug)]
pub struct SwarmArchive {
	header: ArchiveHeader,
	metadata: BTreeMap<String, String>,
	tile_index: TileIndex,
	source: ByteRangeSource,
}

impl SwarmArchive {
	pub async fn open_path(path: &Path) -> Result<SwarmArchive> {
		SwarmArchive::open_source(ByteRangeSource::open_path(path)?).await
	}

	pub async fn open_source(source: ByteRangeSource) -> Result<SwarmArchive> {
		source.init().await?;

		let header_blob = source
			.read_range(&ByteRange::new(0, HEADER_LENGTH))
			.await
			.context("Failed reading the archive header")?;
		let file_header = FileHeader::from_blob(&header_blob)?;

		let metadata = if file_header.meta_range.length > 0 {
			let blob = source
				.read_range(&file_header.meta_range)
				.await
				.context("Failed reading the archive metadata")?;
			decode_metadata(&blob)?
		} else {
			BTreeMap::new()
		};

		let tile_index = if file_header.index_range.length > 0 {
			let blob = source
				.read_range(&file_header.index_range)
				.await
				.context("Failed reading the tile index")?;
			TileIndex::from_blob(&blob)?
		} else {
			TileIndex::new()
		};
		log::debug!(
			"opened {} archive '{}' with {} indexed tiles",
			file_header.tile_type,
			source.key(),
			tile_index.len()
		);

		Ok(SwarmArchive {
			header: file_header.as_archive_header(),
			metadata,
			tile_index,
			source,
		})
	}
}

#[async_trait]
impl TileArchive for SwarmArchive {
	fn source_name(&self) -> &str {
		self.source.key()
	}

	fn container_name(&self) -> &str {
		"swarmtiles"
	}

	fn header(&self) -> &ArchiveHeader {
		&self.header
	}

	async fn metadata(&self) -> Result<BTreeMap<String, String>> {
		Ok(self.metadata.clone())
	}

	async fn get_tile(&self, coord: &TileCoord3) -> Result<Option<Blob>> {
		match self.tile_index.get(coord) {
			Some(range) => Ok(Some(self.source.read_range(range).await?)),
			None => Ok(None),
		}
	}

	async fn close(&self) -> Result<()> {
		self.source.close().await
	}
}
