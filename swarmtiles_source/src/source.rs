use crate::{FileSource, HttpRangeSource, SourceKind, TorrentEngine, TorrentSource, is_magnet_uri};
use anyhow::{Result, ensure};
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use swarmtiles_core::{Blob, ByteRange};

/// One byte-range source, whichever backend serves it.
///
/// All variants share the same contract: [`read_range`](ByteRangeSource::read_range)
/// returns exactly the requested bytes or fails, and after
/// [`close`](ByteRangeSource::close) every call fails instead of hanging.
#[derive(Debug)]
pub enum ByteRangeSource {
	File(FileSource),
	Http(HttpRangeSource),
	Torrent(TorrentSource),
}

impl ByteRangeSource {
	pub fn open_path(path: &Path) -> Result<ByteRangeSource> {
		Ok(ByteRangeSource::File(FileSource::open(path)?))
	}

	pub fn open_url(url: &str) -> Result<ByteRangeSource> {
		Ok(ByteRangeSource::Http(HttpRangeSource::new(url)?))
	}

	pub fn open_swarm(
		magnet: &str, join_timeout: Duration, engine: Arc<dyn TorrentEngine>,
	) -> Result<ByteRangeSource> {
		ensure!(is_magnet_uri(magnet), "'{magnet}' is not a valid magnet URI");
		Ok(ByteRangeSource::Torrent(TorrentSource::new(magnet, join_timeout, engine)))
	}

	pub fn kind(&self) -> SourceKind {
		match self {
			ByteRangeSource::File(_) => SourceKind::File,
			ByteRangeSource::Http(_) => SourceKind::Http,
			ByteRangeSource::Torrent(_) => SourceKind::Torrent,
		}
	}

	/// Prepares the backend for reads. Only the torrent backend has work to
	/// do here; files and HTTP endpoints are ready as soon as they open.
	pub async fn init(&self) -> Result<()> {
		match self {
			ByteRangeSource::File(_) | ByteRangeSource::Http(_) => Ok(()),
			ByteRangeSource::Torrent(source) => source.init().await,
		}
	}

	pub async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		match self {
			ByteRangeSource::File(source) => source.read_range(range).await,
			ByteRangeSource::Http(source) => source.read_range(range).await,
			ByteRangeSource::Torrent(source) => source.read_range(range).await,
		}
	}

	pub fn key(&self) -> &str {
		match self {
			ByteRangeSource::File(source) => source.key(),
			ByteRangeSource::Http(source) => source.key(),
			ByteRangeSource::Torrent(source) => source.key(),
		}
	}

	pub async fn close(&self) -> Result<()> {
		match self {
			ByteRangeSource::File(source) => {
				source.close().await;
				Ok(())
			}
			ByteRangeSource::Http(source) => {
				source.close().await;
				Ok(())
			}
			ByteRangeSource::Torrent(source) => source.close().await,
		}
	}
}
