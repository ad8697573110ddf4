use super::ValueWriterBlob;
use crate::types::{Blob, ByteRange};
use anyhow::{Context, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use std::io::Write;

/// A writer for the protobuf wire primitives the vector tile codec emits.
///
/// Implementors supply the destination; the trait provides varints, zigzag
/// values, field keys and length-delimited payloads on top of it. Scalars are
/// written in the byte order `E`, which is little-endian for all PBF fields.
pub trait ValueWriter<E: ByteOrder> {
	fn get_writer(&mut self) -> &mut dyn Write;
	fn position(&mut self) -> Result<u64>;

	fn is_empty(&mut self) -> Result<bool> {
		Ok(self.position()? == 0)
	}

	fn write_varint(&mut self, mut value: u64) -> Result<()> {
		let writer = self.get_writer();
		while value >= 0x80 {
			writer.write_all(&[((value as u8) & 0x7f) | 0x80])?;
			value >>= 7;
		}
		writer.write_all(&[value as u8])?;
		Ok(())
	}

	/// Zigzag-encoded signed varint (64-bit), as used by `sint64` values.
	fn write_svarint(&mut self, value: i64) -> Result<()> {
		self.write_varint(((value << 1) ^ (value >> 63)) as u64)
	}

	/// Zigzag-encoded signed varint with 32-bit semantics, as used by
	/// geometry coordinate deltas.
	fn write_svarint32(&mut self, value: i32) -> Result<()> {
		self.write_varint(u64::from(((value << 1) ^ (value >> 31)) as u32))
	}

	fn write_u8(&mut self, value: u8) -> Result<()> {
		self.get_writer().write_u8(value)?;
		Ok(())
	}

	fn write_u64(&mut self, value: u64) -> Result<()> {
		self.get_writer().write_u64::<E>(value)?;
		Ok(())
	}

	fn write_f32(&mut self, value: f32) -> Result<()> {
		self.get_writer().write_f32::<E>(value)?;
		Ok(())
	}

	fn write_f64(&mut self, value: f64) -> Result<()> {
		self.get_writer().write_f64::<E>(value)?;
		Ok(())
	}

	fn write_range(&mut self, range: &ByteRange) -> Result<()> {
		self.write_u64(range.offset)?;
		self.write_u64(range.length)
	}

	fn write_slice(&mut self, buf: &[u8]) -> Result<()> {
		self.get_writer().write_all(buf)?;
		Ok(())
	}

	fn write_blob(&mut self, blob: &Blob) -> Result<()> {
		self.write_slice(blob.as_slice())
	}

	fn write_string(&mut self, text: &str) -> Result<()> {
		self.write_slice(text.as_bytes())
	}

	/// Writes a field key: `(field_number << 3) | wire_type`.
	fn write_pbf_key(&mut self, field_number: u32, wire_type: u8) -> Result<()> {
		self
			.write_varint((u64::from(field_number) << 3) | u64::from(wire_type))
			.context("Failed to write PBF key")
	}

	fn write_pbf_packed_uint32(&mut self, data: &[u32]) -> Result<()> {
		let mut writer = ValueWriterBlob::new_le();
		for &value in data {
			writer.write_varint(u64::from(value))?;
		}
		self.write_pbf_blob(&writer.into_blob())
	}

	fn write_pbf_blob(&mut self, blob: &Blob) -> Result<()> {
		self
			.write_varint(blob.len())
			.context("Failed to write length of PBF blob")?;
		self.write_blob(blob).context("Failed to write PBF blob")
	}

	fn write_pbf_string(&mut self, text: &str) -> Result<()> {
		self
			.write_varint(text.len() as u64)
			.context("Failed to write length of PBF string")?;
		self.write_string(text).context("Failed to write PBF string")
	}
}
