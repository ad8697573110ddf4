use crate::SourceError;
use anyhow::{Context, Result, ensure};
use futures::lock::Mutex;
use std::fmt::Debug;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use swarmtiles_core::{Blob, ByteRange};

/// A byte-range source over a local file.
///
/// Every read clones the underlying handle and seeks on the clone, so
/// concurrent reads on one source never share a cursor.
pub struct FileSource {
	name: String,
	file: Mutex<Option<File>>,
	size: u64,
}

impl FileSource {
	/// Opens `path` for ranged reading. The source's key stays the path as
	/// given, even if it is relative.
	pub fn open(path: &Path) -> Result<FileSource> {
		let name = path.to_string_lossy().to_string();
		if !path.is_file() {
			return Err(SourceError::SourceUnavailable(format!("file {path:?} does not exist")).into());
		}
		let file = File::open(path)
			.map_err(|err| SourceError::SourceUnavailable(format!("cannot open {path:?}: {err}")))?;
		let size = file
			.metadata()
			.with_context(|| format!("Failed to get metadata for file {path:?}"))?
			.len();

		Ok(FileSource {
			name,
			file: Mutex::new(Some(file)),
			size,
		})
	}

	pub async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		let mut file = {
			let guard = self.file.lock().await;
			match guard.as_ref() {
				Some(file) => file
					.try_clone()
					.with_context(|| format!("Failed to clone file handle for '{}'", self.name))?,
				None => return Err(SourceError::SourceClosed(self.name.clone()).into()),
			}
		};

		ensure!(
			range.end() <= self.size,
			"range {range} exceeds file size ({}) of '{}'",
			self.size,
			self.name
		);

		let mut buffer = vec![0; range.length as usize];
		file
			.seek(SeekFrom::Start(range.offset))
			.with_context(|| format!("Failed to seek to offset {} in '{}'", range.offset, self.name))?;
		file
			.read_exact(&mut buffer)
			.with_context(|| format!("Failed to read {range} from '{}'", self.name))?;

		Ok(Blob::from(buffer))
	}

	pub fn size(&self) -> u64 {
		self.size
	}

	pub fn key(&self) -> &str {
		&self.name
	}

	/// Closes the file descriptor. Later reads fail with
	/// [`SourceError::SourceClosed`].
	pub async fn close(&self) {
		self.file.lock().await.take();
	}
}

impl Debug for FileSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FileSource")
			.field("name", &self.name)
			.field("size", &self.size)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::prelude::*;
	use swarmtiles_core::assert_wildcard;

	fn temp_file(content: &[u8]) -> Result<assert_fs::NamedTempFile> {
		let file = assert_fs::NamedTempFile::new("archive.bin")?;
		file.write_binary(content)?;
		Ok(file)
	}

	#[tokio::test]
	async fn read_matches_full_file_slice() -> Result<()> {
		let content: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
		let file = temp_file(&content)?;
		let source = FileSource::open(file.path())?;

		for &(offset, length) in &[(0u64, 1000u64), (0, 1), (999, 1), (123, 456), (500, 500)] {
			let blob = source.read_range(&ByteRange::new(offset, length)).await?;
			assert_eq!(
				blob.as_slice(),
				&content[offset as usize..(offset + length) as usize],
				"range {offset}+{length}"
			);
		}
		Ok(())
	}

	#[tokio::test]
	async fn read_past_end_fails() -> Result<()> {
		let file = temp_file(&[1, 2, 3, 4])?;
		let source = FileSource::open(file.path())?;
		assert!(source.read_range(&ByteRange::new(3, 2)).await.is_err());
		Ok(())
	}

	#[tokio::test]
	async fn concurrent_reads_are_independent() -> Result<()> {
		let content: Vec<u8> = (0..100).map(|i| (i * 7) as u8).collect();
		let file = temp_file(&content)?;
		let source = std::sync::Arc::new(FileSource::open(file.path())?);

		let mut handles = Vec::new();
		for i in 0..10u64 {
			let source = source.clone();
			handles.push(tokio::spawn(async move {
				source.read_range(&ByteRange::new(i * 10, 10)).await
			}));
		}
		for (i, handle) in handles.into_iter().enumerate() {
			let blob = handle.await??;
			assert_eq!(blob.as_slice(), &content[i * 10..(i + 1) * 10]);
		}
		Ok(())
	}

	#[test]
	fn missing_file_is_source_unavailable() {
		let err = FileSource::open(Path::new("/no/such/file.bin")).unwrap_err();
		assert!(matches!(
			err.downcast_ref::<SourceError>(),
			Some(SourceError::SourceUnavailable(_))
		));
	}

	#[tokio::test]
	async fn closed_source_fails_without_hanging() -> Result<()> {
		let file = temp_file(&[0; 16])?;
		let source = FileSource::open(file.path())?;
		source.close().await;

		let err = source.read_range(&ByteRange::new(0, 4)).await.unwrap_err();
		assert!(matches!(
			err.downcast_ref::<SourceError>(),
			Some(SourceError::SourceClosed(_))
		));
		Ok(())
	}

	#[tokio::test]
	async fn key_is_the_given_path() -> Result<()> {
		let file = temp_file(b"data")?;
		let source = FileSource::open(file.path())?;
		assert_wildcard!(source.key(), "*archive.bin");
		assert_eq!(source.size(), 4);
		Ok(())
	}
}
