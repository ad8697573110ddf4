use anyhow::{Context, Result};
use std::collections::BTreeMap;
use swarmtiles_core::Blob;
use swarmtiles_core::io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob};

/// Serializes the embedded metadata mapping as alternating length-prefixed
/// key and value strings. The `BTreeMap` ordering keeps the output stable.
pub fn encode_metadata(metadata: &BTreeMap<String, String>) -> Result<Blob> {
	let mut writer = ValueWriterBlob::new_le();
	for (key, value) in metadata {
		writer.write_pbf_string(key)?;
		writer.write_pbf_string(value)?;
	}
	Ok(writer.into_blob())
}

pub fn decode_metadata(blob: &Blob) -> Result<BTreeMap<String, String>> {
	let mut reader = ValueReaderSlice::new_le(blob.as_slice());
	let mut metadata = BTreeMap::new();
	while reader.has_remaining() {
		let key = reader.read_pbf_string().context("Failed to read metadata key")?;
		let value = reader.read_pbf_string().context("Failed to read metadata value")?;
		metadata.insert(key, value);
	}
	Ok(metadata)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trip() -> Result<()> {
		let mut metadata = BTreeMap::new();
		metadata.insert("name".to_string(), "planet".to_string());
		metadata.insert("attribution".to_string(), "© contributors".to_string());
		metadata.insert("empty".to_string(), String::new());

		assert_eq!(decode_metadata(&encode_metadata(&metadata)?)?, metadata);
		Ok(())
	}

	#[test]
	fn empty_mapping_is_empty_blob() -> Result<()> {
		let blob = encode_metadata(&BTreeMap::new())?;
		assert!(blob.is_empty());
		assert!(decode_metadata(&blob)?.is_empty());
		Ok(())
	}

	#[test]
	fn dangling_key_fails() -> Result<()> {
		let mut metadata = BTreeMap::new();
		metadata.insert("name".to_string(), "planet".to_string());
		let blob = encode_metadata(&metadata)?;

		// keep the key but cut the value off
		let truncated = Blob::from(&blob.as_slice()[..6]);
		assert!(decode_metadata(&truncated).is_err());
		Ok(())
	}
}
