use crate::types::{Blob, ByteRange};
use anyhow::{Context, Result, bail};
use byteorder::{ByteOrder, ReadBytesExt};
use std::io::{Read, Seek};

/// Byte sources a [`ValueReader`] can draw from.
pub trait SeekRead: Seek + Read {}

/// A reader for the protobuf wire primitives the vector tile codec consumes.
///
/// The mirror image of [`super::ValueWriter`]: varints, zigzag values, field
/// keys and length-delimited payloads over a seekable byte source. Scalars
/// are read in the byte order `E`.
pub trait ValueReader<'a, E: ByteOrder + 'a> {
	fn get_reader(&mut self) -> &mut dyn SeekRead;
	fn len(&self) -> u64;
	fn position(&mut self) -> u64;
	fn set_position(&mut self, position: u64) -> Result<()>;
	fn get_sub_reader<'b>(&'b mut self, length: u64) -> Result<Box<dyn ValueReader<'b, E> + 'b>>
	where
		'a: 'b;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn has_remaining(&mut self) -> bool {
		self.position() < self.len()
	}

	fn remaining(&mut self) -> u64 {
		self.len() - self.position()
	}

	fn read_u8(&mut self) -> Result<u8> {
		self.get_reader().read_u8().context("Failed to read u8")
	}

	fn read_u64(&mut self) -> Result<u64> {
		self.get_reader().read_u64::<E>().context("Failed to read u64")
	}

	fn read_f32(&mut self) -> Result<f32> {
		self.get_reader().read_f32::<E>().context("Failed to read f32")
	}

	fn read_f64(&mut self) -> Result<f64> {
		self.get_reader().read_f64::<E>().context("Failed to read f64")
	}

	fn read_range(&mut self) -> Result<ByteRange> {
		Ok(ByteRange::new(
			self.read_u64().context("Failed to read offset of range")?,
			self.read_u64().context("Failed to read length of range")?,
		))
	}

	fn read_varint(&mut self) -> Result<u64> {
		let mut value = 0;
		let mut shift = 0;
		loop {
			let byte = self.read_u8().context("Failed to read byte for varint")?;
			value |= u64::from(byte & 0x7f) << shift;
			if byte & 0x80 == 0 {
				break;
			}
			shift += 7;
			if shift >= 70 {
				bail!("Varint too long");
			}
		}
		Ok(value)
	}

	fn read_svarint(&mut self) -> Result<i64> {
		let sint_value = self.read_varint().context("Failed to read varint for svarint")? as i64;
		Ok((sint_value >> 1) ^ -(sint_value & 1))
	}

	/// Inverse of [`super::ValueWriter::write_svarint32`].
	fn read_svarint32(&mut self) -> Result<i32> {
		let value = self.read_varint().context("Failed to read varint for svarint32")? as u32;
		Ok(((value >> 1) as i32) ^ -((value & 1) as i32))
	}

	fn read_string(&mut self, length: u64) -> Result<String> {
		let mut vec = vec![0u8; length as usize];
		self
			.get_reader()
			.read_exact(&mut vec)
			.context("Failed to read exact data for string")?;
		String::from_utf8(vec).context("Failed to convert bytes to string")
	}

	fn read_blob(&mut self, length: u64) -> Result<Blob> {
		let mut blob = Blob::new_sized(length as usize);
		self
			.get_reader()
			.read_exact(blob.as_mut_slice())
			.context("Failed to read exact data for blob")?;
		Ok(blob)
	}

	/// Reads a field key and splits it into `(field_number, wire_type)`.
	fn read_pbf_key(&mut self) -> Result<(u32, u8)> {
		let value = self.read_varint().context("Failed to read varint for PBF key")?;
		Ok(((value >> 3) as u32, (value & 0x07) as u8))
	}

	fn get_pbf_sub_reader<'b>(&'b mut self) -> Result<Box<dyn ValueReader<'b, E> + 'b>>
	where
		'a: 'b,
	{
		let length = self.read_varint().context("Failed to read varint for sub-reader length")?;
		self.get_sub_reader(length).context("Failed to get sub-reader")
	}

	fn read_pbf_packed_uint32(&mut self) -> Result<Vec<u32>> {
		let length = self.read_varint().context("Failed to read varint for packed length")?;
		let mut reader = self
			.get_sub_reader(length)
			.context("Failed to get sub-reader for packed uint32")?;
		let mut values = Vec::new();
		while reader.has_remaining() {
			values.push(reader.read_varint().context("Failed to read varint in packed uint32")? as u32);
		}
		Ok(values)
	}

	fn read_pbf_string(&mut self) -> Result<String> {
		let length = self.read_varint().context("Failed to read varint for string length")?;
		self.read_string(length).context("Failed to read PBF string")
	}

	fn read_pbf_blob(&mut self) -> Result<Blob> {
		let length = self.read_varint().context("Failed to read varint for blob length")?;
		self.read_blob(length).context("Failed to read PBF blob")
	}
}
