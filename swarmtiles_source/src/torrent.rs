use crate::SourceError;
use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use futures::lock::Mutex;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use swarmtiles_core::{Blob, ByteRange, LimitedCache};
use tokio::time::{sleep, timeout};

/// The external peer-to-peer download capability a [`TorrentSource`] runs on.
///
/// The engine owns protocol internals (peer discovery, piece selection,
/// verification); this crate only asks it for pieces. The last piece may be
/// shorter than [`piece_size`](TorrentEngine::piece_size).
#[async_trait]
pub trait TorrentEngine: Debug + Send + Sync {
	/// Piece length in bytes.
	fn piece_size(&self) -> u64;

	/// Total content length in bytes.
	fn total_size(&self) -> u64;

	/// Download progress in `[0, 1]`. Non-zero progress means the swarm is
	/// reachable and delivering data.
	async fn progress(&self) -> Result<f64>;

	/// Fetches one piece, suspending until it is available or failing.
	async fn fetch_piece(&self, index: u64) -> Result<Blob>;

	/// Tears down the swarm client.
	async fn shutdown(&self) -> Result<()>;
}

const PROGRESS_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A byte-range source reconstructing reads from BitTorrent pieces.
///
/// A read maps its byte range onto the covering run of piece indices,
/// fetches each piece in increasing order, slices the first and last pieces
/// partially and interior pieces fully, and concatenates the result. Fetched
/// pieces are kept in a cache owned by the source, unbounded by default.
pub struct TorrentSource {
	name: String,
	join_timeout: Duration,
	engine: Mutex<Option<Arc<dyn TorrentEngine>>>,
	initialized: Mutex<bool>,
	piece_cache: Mutex<LimitedCache<u64, Blob>>,
}

impl TorrentSource {
	/// Creates a source over `engine` for the swarm identified by
	/// `identifier` (kept verbatim as the source key). `join_timeout` bounds
	/// the wait in [`init`](TorrentSource::init).
	pub fn new(identifier: &str, join_timeout: Duration, engine: Arc<dyn TorrentEngine>) -> TorrentSource {
		TorrentSource {
			name: identifier.to_string(),
			join_timeout,
			engine: Mutex::new(Some(engine)),
			initialized: Mutex::new(false),
			piece_cache: Mutex::new(LimitedCache::new()),
		}
	}

	/// Caps the piece cache at `max_pieces` entries. Without a cap, pieces
	/// are retained for the life of the source.
	pub fn with_piece_cache_limit(mut self, max_pieces: usize) -> TorrentSource {
		self.piece_cache = Mutex::new(LimitedCache::with_maximum_length(max_pieces));
		self
	}

	/// Waits until the swarm reports non-zero download progress.
	///
	/// Idempotent: concurrent and repeated calls share one join; none starts
	/// a second one. Fails with [`SourceError::SourceUnavailable`] when the
	/// join errors or `join_timeout` elapses first.
	pub async fn init(&self) -> Result<()> {
		// Holding the lock for the whole wait is what makes concurrent
		// callers piggyback on the first join.
		let mut initialized = self.initialized.lock().await;
		if *initialized {
			return Ok(());
		}

		let engine = self.engine().await?;
		let wait_for_progress = async {
			loop {
				let progress = engine.progress().await?;
				if progress > 0.0 {
					return Ok::<(), anyhow::Error>(());
				}
				sleep(PROGRESS_POLL_INTERVAL).await;
			}
		};

		match timeout(self.join_timeout, wait_for_progress).await {
			Ok(Ok(())) => {
				*initialized = true;
				Ok(())
			}
			Ok(Err(err)) => {
				Err(SourceError::SourceUnavailable(format!("swarm join failed for '{}': {err}", self.name)).into())
			}
			Err(_) => Err(
				SourceError::SourceUnavailable(format!(
					"swarm join timed out after {:?} for '{}'",
					self.join_timeout, self.name
				))
				.into(),
			),
		}
	}

	pub async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		let engine = self.engine().await?;
		let piece_size = engine.piece_size();

		ensure!(range.length > 0, "cannot read an empty range from '{}'", self.name);
		ensure!(piece_size > 0, "engine for '{}' reports a zero piece size", self.name);
		ensure!(
			range.end() <= engine.total_size(),
			"range {range} exceeds content size ({}) of '{}'",
			engine.total_size(),
			self.name
		);

		let start_piece = range.offset / piece_size;
		let end_piece = (range.end() - 1) / piece_size;

		let mut output = Vec::with_capacity(range.length as usize);
		for index in start_piece..=end_piece {
			let piece = self.piece(engine.as_ref(), index).await?;
			let piece_start = index * piece_size;
			// One window formula for first, interior and last pieces.
			let begin = range.offset.max(piece_start) - piece_start;
			let end = range.end().min(piece_start + piece_size) - piece_start;
			ensure!(
				end <= piece.len(),
				"piece {index} of '{}' is shorter ({}) than expected ({end})",
				self.name,
				piece.len()
			);
			output.extend_from_slice(&piece.as_slice()[begin as usize..end as usize]);
		}

		ensure!(
			output.len() as u64 == range.length,
			"assembled {} bytes instead of {} for {range} from '{}'",
			output.len(),
			range.length,
			self.name
		);
		Ok(Blob::from(output))
	}

	pub fn key(&self) -> &str {
		&self.name
	}

	/// Tears down the swarm client. Later reads fail with
	/// [`SourceError::SourceClosed`]; closing again is a no-op.
	pub async fn close(&self) -> Result<()> {
		let engine = self.engine.lock().await.take();
		if let Some(engine) = engine {
			engine
				.shutdown()
				.await
				.with_context(|| format!("Failed to shut down torrent engine for '{}'", self.name))?;
		}
		Ok(())
	}

	async fn engine(&self) -> Result<Arc<dyn TorrentEngine>> {
		match self.engine.lock().await.as_ref() {
			Some(engine) => Ok(engine.clone()),
			None => Err(SourceError::SourceClosed(self.name.clone()).into()),
		}
	}

	async fn piece(&self, engine: &dyn TorrentEngine, index: u64) -> Result<Blob> {
		if let Some(piece) = self.piece_cache.lock().await.get(&index) {
			return Ok(piece);
		}
		// Concurrent reads may race to fetch the same piece; the cache keeps
		// the first copy.
		let piece = engine.fetch_piece(index).await.map_err(|err| SourceError::PieceUnavailable {
			index,
			reason: err.to_string(),
		})?;
		log::debug!("fetched piece {index} ({} bytes) for '{}'", piece.len(), self.name);
		Ok(self.piece_cache.lock().await.add(index, piece))
	}
}

impl Debug for TorrentSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TorrentSource")
			.field("name", &self.name)
			.field("join_timeout", &self.join_timeout)
			.finish()
	}
}
