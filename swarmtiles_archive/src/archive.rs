use crate::ArchiveHeader;
use anyhow::Result;
use async_trait::async_trait;
use std::{collections::BTreeMap, fmt::Debug};
use swarmtiles_core::{Blob, TileCoord3};

/// Object-safe boundary to an archive format implementation.
///
/// Implementors parse their container (header, embedded metadata, tile
/// directory) and answer per-coordinate lookups. They do not interpret the
/// metadata; [`crate::ArchiveReader`] owns the normalization rules.
#[async_trait]
pub trait TileArchive: Debug + Send + Sync {
	/// Short identifier for the underlying source (path, URL or magnet URI).
	fn source_name(&self) -> &str;

	/// Container format name (e.g. `"swarmtiles"`).
	fn container_name(&self) -> &str;

	/// Parsed header fields.
	fn header(&self) -> &ArchiveHeader;

	/// Embedded metadata key/value mapping.
	async fn metadata(&self) -> Result<BTreeMap<String, String>>;

	/// Fetches one tile. `Ok(None)` marks a gap inside the declared range.
	///
	/// Implementors may assume `coord` has already passed the reader's range
	/// checks.
	async fn get_tile(&self, coord: &TileCoord3) -> Result<Option<Blob>>;

	/// Releases the underlying source. Default is a no-op for archives
	/// without an owned handle.
	async fn close(&self) -> Result<()> {
		Ok(())
	}

	fn boxed(self) -> Box<dyn TileArchive>
	where
		Self: Sized + 'static,
	{
		Box::new(self)
	}
}
