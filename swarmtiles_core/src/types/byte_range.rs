use std::fmt;
use std::ops::Range;

/// A contiguous range of bytes within a logical archive.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct ByteRange {
	pub offset: u64,
	pub length: u64,
}

impl ByteRange {
	pub fn new(offset: u64, length: u64) -> ByteRange {
		ByteRange { offset, length }
	}

	pub fn empty() -> ByteRange {
		ByteRange { offset: 0, length: 0 }
	}

	/// First byte offset past the end of the range.
	pub fn end(&self) -> u64 {
		self.offset + self.length
	}

	pub fn as_range_usize(&self) -> Range<usize> {
		(self.offset as usize)..(self.end() as usize)
	}
}

impl fmt::Debug for ByteRange {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "ByteRange[{},{}]", self.offset, self.length)
	}
}

impl fmt::Display for ByteRange {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "bytes {}..{}", self.offset, self.end())
	}
}
