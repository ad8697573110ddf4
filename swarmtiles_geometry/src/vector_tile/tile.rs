use super::VectorTileLayer;
use anyhow::{Context, Result, bail};
use swarmtiles_core::{
	Blob,
	io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob},
};

/// A vector tile: repeated embedded layers, field 3.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTile {
	pub layers: Vec<VectorTileLayer>,
}

impl VectorTile {
	pub fn new(layers: Vec<VectorTileLayer>) -> VectorTile {
		VectorTile { layers }
	}

	pub fn from_blob(blob: &Blob) -> Result<VectorTile> {
		let mut reader = ValueReaderSlice::new_le(blob.as_slice());
		let mut tile = VectorTile::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(3, 2) => {
					let mut sub_reader = reader.get_pbf_sub_reader().context("Failed to get layer sub-reader")?;
					tile
						.layers
						.push(VectorTileLayer::read(sub_reader.as_mut()).context("Failed to read layer")?);
				}
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(tile)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		for layer in &self.layers {
			writer.write_pbf_key(3, 2)?;
			writer.write_pbf_blob(&layer.to_blob().context("Failed to encode layer")?)?;
		}

		Ok(writer.into_blob())
	}

	pub fn find_layer(&self, name: &str) -> Option<&VectorTileLayer> {
		self.layers.iter().find(|layer| layer.name == name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geo::{GeoFeature, Geometry};
	use pretty_assertions::assert_eq;

	fn layer(name: &str) -> VectorTileLayer {
		VectorTileLayer::from_features(
			name.to_string(),
			vec![GeoFeature::new(Geometry::new_multi_point(vec![[1.0, 2.0]]))],
			4096,
		)
		.unwrap()
	}

	#[test]
	fn empty_tile_is_an_empty_blob() -> Result<()> {
		assert!(VectorTile::default().to_blob()?.is_empty());
		assert_eq!(VectorTile::from_blob(&Blob::new_empty())?, VectorTile::default());
		Ok(())
	}

	#[test]
	fn tile_round_trip() -> Result<()> {
		let tile = VectorTile::new(vec![layer("water"), layer("terrain")]);
		let decoded = VectorTile::from_blob(&tile.to_blob()?)?;
		assert_eq!(decoded, tile);
		Ok(())
	}

	#[test]
	fn find_layer_by_name() {
		let tile = VectorTile::new(vec![layer("water"), layer("terrain")]);
		assert_eq!(tile.find_layer("terrain").map(|l| l.name.as_str()), Some("terrain"));
		assert!(tile.find_layer("roads").is_none());
	}

	#[test]
	fn unexpected_field_fails() {
		let blob = Blob::from(vec![0x0A, 0x00]);
		assert!(VectorTile::from_blob(&blob).is_err());
	}
}
