use crate::geo::GeoValue;
use anyhow::{Context, Result, anyhow, bail};
use byteorder::LE;
use swarmtiles_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};

/// Wire codec for the `Value` message of a layer's value table.
///
/// Sub-field per variant: string 1, float 2, double 3, uint 5, signed
/// int 6, bool 7. Plain int64 (field 4) is accepted on read. `Null` has
/// no wire form; the layer encoder drops null properties before they
/// reach this codec.
pub trait GeoValueCodec<'a> {
	fn read(reader: &mut dyn ValueReader<'a, LE>) -> Result<GeoValue>;
	fn to_blob(&self) -> Result<Blob>;
}

impl<'a> GeoValueCodec<'a> for GeoValue {
	fn read(reader: &mut dyn ValueReader<'a, LE>) -> Result<GeoValue> {
		use GeoValue::*;
		let mut value: Option<GeoValue> = None;

		while reader.has_remaining() {
			value = Some(match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => String(reader.read_pbf_string().context("Failed to read string value")?),
				(2, 5) => F32(reader.read_f32().context("Failed to read f32 value")?),
				(3, 1) => F64(reader.read_f64().context("Failed to read f64 value")?),
				(4, 0) => Int(reader.read_varint().context("Failed to read varint for int value")? as i64),
				(5, 0) => UInt(reader.read_varint().context("Failed to read varint for uint value")?),
				(6, 0) => Int(reader.read_svarint().context("Failed to read svarint value")?),
				(7, 0) => Bool(reader.read_varint().context("Failed to read varint for bool value")? != 0),
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			});
		}

		value.ok_or_else(|| anyhow!("Empty value message"))
	}

	fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		match self {
			GeoValue::String(v) => {
				writer.write_pbf_key(1, 2)?;
				writer.write_pbf_string(v)?;
			}
			GeoValue::F32(v) => {
				writer.write_pbf_key(2, 5)?;
				writer.write_f32(*v)?;
			}
			GeoValue::F64(v) => {
				writer.write_pbf_key(3, 1)?;
				writer.write_f64(*v)?;
			}
			GeoValue::UInt(v) => {
				writer.write_pbf_key(5, 0)?;
				writer.write_varint(*v)?;
			}
			GeoValue::Int(v) => {
				writer.write_pbf_key(6, 0)?;
				writer.write_svarint(*v)?;
			}
			GeoValue::Bool(v) => {
				writer.write_pbf_key(7, 0)?;
				writer.write_varint(u64::from(*v))?;
			}
			GeoValue::Null => bail!("Null values have no wire form"),
		}

		Ok(writer.into_blob())
	}
}
