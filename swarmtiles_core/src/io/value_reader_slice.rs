use super::{SeekRead, ValueReader};
use anyhow::{Result, anyhow, bail};
use byteorder::{BE, ByteOrder, LE};
use std::io::Cursor;
use std::marker::PhantomData;

/// A [`ValueReader`] over a borrowed byte slice.
pub struct ValueReaderSlice<'a, E: ByteOrder> {
	_phantom: PhantomData<E>,
	cursor: Cursor<&'a [u8]>,
	len: u64,
}

impl<'a, E: ByteOrder> ValueReaderSlice<'a, E> {
	pub fn new(slice: &'a [u8]) -> ValueReaderSlice<'a, E> {
		ValueReaderSlice {
			_phantom: PhantomData,
			cursor: Cursor::new(slice),
			len: slice.len() as u64,
		}
	}
}

impl<'a> ValueReaderSlice<'a, LE> {
	pub fn new_le(slice: &'a [u8]) -> ValueReaderSlice<'a, LE> {
		ValueReaderSlice::new(slice)
	}
}

impl<'a> ValueReaderSlice<'a, BE> {
	pub fn new_be(slice: &'a [u8]) -> ValueReaderSlice<'a, BE> {
		ValueReaderSlice::new(slice)
	}
}

impl<'a> SeekRead for Cursor<&'a [u8]> {}

impl<'a, E: ByteOrder + 'a> ValueReader<'a, E> for ValueReaderSlice<'a, E> {
	fn get_reader(&mut self) -> &mut dyn SeekRead {
		&mut self.cursor
	}

	fn len(&self) -> u64 {
		self.len
	}

	fn position(&mut self) -> u64 {
		self.cursor.position()
	}

	fn set_position(&mut self, position: u64) -> Result<()> {
		if position > self.len {
			bail!("set position ({position}) outside length ({})", self.len);
		}
		self.cursor.set_position(position);
		Ok(())
	}

	fn get_sub_reader<'b>(&'b mut self, length: u64) -> Result<Box<dyn ValueReader<'b, E> + 'b>>
	where
		'a: 'b,
	{
		let start = self.cursor.position();
		let end = start + length;
		if end > self.len {
			bail!("sub-reader length ({length}) exceeds remaining data");
		}
		self.cursor.set_position(end);
		Ok(Box::new(ValueReaderSlice::<E>::new(
			self
				.cursor
				.get_ref()
				.get(start as usize..end as usize)
				.ok_or_else(|| anyhow!("sub-reader slice out of bounds"))?,
		)))
	}
}
