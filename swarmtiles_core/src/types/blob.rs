use crate::types::ByteRange;
use anyhow::{Result, ensure};
use std::fmt::Debug;

/// An owned byte buffer.
///
/// `Blob` is the unit of data handed between sources, archives and codecs:
/// tile payloads, protobuf messages, raster bytes, torrent pieces.
///
/// # Example
/// ```
/// use swarmtiles_core::Blob;
///
/// let blob = Blob::from("tile data");
/// assert_eq!(blob.len(), 9);
/// assert_eq!(blob.as_str(), "tile data");
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Returns an empty blob.
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Returns a zero-filled blob of the given length.
	pub fn new_sized(length: usize) -> Blob {
		Blob(vec![0u8; length])
	}

	/// Returns a copy of the bytes covered by `range`.
	///
	/// Fails if the range reaches past the end of the blob.
	pub fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		ensure!(
			range.offset + range.length <= self.0.len() as u64,
			"byte range {range:?} exceeds blob length ({})",
			self.0.len()
		);
		Ok(Blob(self.0[range.as_range_usize()].to_vec()))
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	pub fn as_mut_slice(&mut self) -> &mut [u8] {
		&mut self.0
	}

	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Interprets the bytes as UTF-8, lossily.
	pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
		String::from_utf8_lossy(&self.0)
	}

	/// Space-separated lowercase hex, for debugging.
	pub fn as_hex(&self) -> String {
		self
			.0
			.iter()
			.map(|b| format!("{b:02x}"))
			.collect::<Vec<String>>()
			.join(" ")
	}

	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(value: Vec<u8>) -> Self {
		Blob(value)
	}
}

impl From<&[u8]> for Blob {
	fn from(value: &[u8]) -> Self {
		Blob(value.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(value: &[u8; N]) -> Self {
		Blob(value.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(value: &str) -> Self {
		Blob(value.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(value: String) -> Self {
		Blob(value.into_bytes())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({}): {}", self.len(), self.as_hex())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn construction_and_length() {
		assert!(Blob::new_empty().is_empty());
		assert_eq!(Blob::new_sized(5).len(), 5);
		assert_eq!(Blob::from(vec![1, 2, 3]).as_slice(), &[1, 2, 3]);
	}

	#[test]
	fn read_range_in_bounds() -> Result<()> {
		let blob = Blob::from(&[10u8, 20, 30, 40, 50]);
		let part = blob.read_range(&ByteRange::new(1, 3))?;
		assert_eq!(part.as_slice(), &[20, 30, 40]);
		Ok(())
	}

	#[test]
	fn read_range_out_of_bounds() {
		let blob = Blob::from(&[1u8, 2, 3]);
		assert!(blob.read_range(&ByteRange::new(2, 2)).is_err());
	}

	#[test]
	fn hex_and_debug() {
		let blob = Blob::from(&[0u8, 255, 16]);
		assert_eq!(blob.as_hex(), "00 ff 10");
		assert_eq!(format!("{blob:?}"), "Blob(3): 00 ff 10");
	}

	#[test]
	fn string_conversion() {
		let blob = Blob::from("héllo");
		assert_eq!(blob.as_str(), "héllo");
		assert_eq!(Blob::from(String::from("x")).len(), 1);
	}
}
