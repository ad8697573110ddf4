use super::{GeoValueCodec, PropertyInterner, VectorTileFeature};
use crate::geo::{GeoFeature, GeoValue};
use anyhow::{Context, Result, bail};
use byteorder::LE;
use swarmtiles_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};

/// One named layer of a vector tile.
///
/// Layers built with [`VectorTileLayer::from_features`] carry version 2
/// and freshly interned key/value tables; decoded layers carry whatever
/// the wire said.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorTileLayer {
	pub version: u32,
	pub name: String,
	pub extent: u32,
	pub features: Vec<VectorTileFeature>,
	pub interner: PropertyInterner,
}

impl Default for VectorTileLayer {
	// wire defaults of the layer message
	fn default() -> Self {
		VectorTileLayer {
			version: 1,
			name: String::new(),
			extent: 4096,
			features: Vec::new(),
			interner: PropertyInterner::new(),
		}
	}
}

impl VectorTileLayer {
	/// Encodes features into a layer, interning their properties into
	/// per-layer tables in first-use order.
	pub fn from_features(name: String, features: Vec<GeoFeature>, extent: u32) -> Result<VectorTileLayer> {
		let mut interner = PropertyInterner::new();
		let features = features
			.into_iter()
			.map(|feature| VectorTileFeature::from_geo_feature(feature, &mut interner))
			.collect::<Result<Vec<_>>>()
			.context("Failed to encode layer features")?;

		Ok(VectorTileLayer {
			version: 2,
			name,
			extent,
			features,
			interner,
		})
	}

	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<VectorTileLayer> {
		let mut layer = VectorTileLayer::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => layer.name = reader.read_pbf_string().context("Failed to read layer name")?,
				(2, 2) => {
					let mut sub_reader = reader.get_pbf_sub_reader().context("Failed to get feature sub-reader")?;
					layer
						.features
						.push(VectorTileFeature::read(sub_reader.as_mut()).context("Failed to read feature")?);
				}
				(3, 2) => {
					layer
						.interner
						.keys
						.push(reader.read_pbf_string().context("Failed to read property key")?);
				}
				(4, 2) => {
					let mut sub_reader = reader.get_pbf_sub_reader().context("Failed to get value sub-reader")?;
					layer
						.interner
						.values
						.push(GeoValue::read(sub_reader.as_mut()).context("Failed to read property value")?);
				}
				(5, 0) => layer.extent = reader.read_varint().context("Failed to read extent")? as u32,
				(15, 0) => layer.version = reader.read_varint().context("Failed to read version")? as u32,
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(layer)
	}

	/// Serializes the layer with a fixed field order so identical layers
	/// are byte-identical: version, name, extent, features, key table,
	/// value table. The extent is written even at its default of 4096.
	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		writer.write_pbf_key(15, 0)?;
		writer.write_varint(u64::from(self.version))?;

		writer.write_pbf_key(1, 2)?;
		writer.write_pbf_string(&self.name)?;

		writer.write_pbf_key(5, 0)?;
		writer.write_varint(u64::from(self.extent))?;

		for feature in &self.features {
			writer.write_pbf_key(2, 2)?;
			writer.write_pbf_blob(&feature.to_blob().context("Failed to encode feature")?)?;
		}

		for key in self.interner.keys.iter() {
			writer.write_pbf_key(3, 2)?;
			writer.write_pbf_string(key)?;
		}

		for value in self.interner.values.iter() {
			writer.write_pbf_key(4, 2)?;
			writer.write_pbf_blob(&value.to_blob().context("Failed to encode property value")?)?;
		}

		Ok(writer.into_blob())
	}

	/// Decodes every feature back into the model.
	pub fn to_features(&self) -> Result<Vec<GeoFeature>> {
		self
			.features
			.iter()
			.map(|feature| feature.to_geo_feature(&self.interner))
			.collect()
	}
}
