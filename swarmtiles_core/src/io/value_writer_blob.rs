use super::ValueWriter;
use crate::types::Blob;
use anyhow::Result;
use byteorder::{BE, ByteOrder, LE};
use std::io::{Cursor, Write};
use std::marker::PhantomData;

/// A [`ValueWriter`] that collects into an owned [`Blob`].
pub struct ValueWriterBlob<E: ByteOrder> {
	_phantom: PhantomData<E>,
	cursor: Cursor<Vec<u8>>,
}

impl<E: ByteOrder> ValueWriterBlob<E> {
	pub fn new() -> ValueWriterBlob<E> {
		ValueWriterBlob {
			_phantom: PhantomData,
			cursor: Cursor::new(Vec::new()),
		}
	}

	pub fn into_blob(self) -> Blob {
		Blob::from(self.cursor.into_inner())
	}
}

impl ValueWriterBlob<LE> {
	pub fn new_le() -> ValueWriterBlob<LE> {
		ValueWriterBlob::new()
	}
}

impl ValueWriterBlob<BE> {
	pub fn new_be() -> ValueWriterBlob<BE> {
		ValueWriterBlob::new()
	}
}

impl<E: ByteOrder> ValueWriter<E> for ValueWriterBlob<E> {
	fn get_writer(&mut self) -> &mut dyn Write {
		&mut self.cursor
	}

	fn position(&mut self) -> Result<u64> {
		Ok(self.cursor.position())
	}
}

impl<E: ByteOrder> Default for ValueWriterBlob<E> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn collects_writes() -> Result<()> {
		let mut writer = ValueWriterBlob::new_le();
		assert!(writer.is_empty()?);
		writer.write_varint(150)?;
		writer.write_slice(&[9])?;
		assert_eq!(writer.position()?, 3);
		assert_eq!(writer.into_blob().as_slice(), &[0x96, 0x01, 9]);
		Ok(())
	}

	#[test]
	fn big_endian_scalars() -> Result<()> {
		let mut writer = ValueWriterBlob::new_be();
		writer.write_f32(1.0)?;
		assert_eq!(writer.into_blob().as_slice(), &[0x3f, 0x80, 0x00, 0x00]);
		Ok(())
	}
}
