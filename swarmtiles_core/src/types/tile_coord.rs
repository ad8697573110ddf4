use anyhow::{Result, ensure};
use std::fmt::Debug;

/// A tile address: `x`, `y` column/row and zoom level `z`.
///
/// Construction enforces `x, y < 2^z`, so a held value is always a real
/// tile of the pyramid.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct TileCoord3 {
	pub x: u32,
	pub y: u32,
	pub z: u8,
}

impl TileCoord3 {
	pub fn new(x: u32, y: u32, z: u8) -> Result<TileCoord3> {
		ensure!(z <= 31, "z ({z}) must be <= 31");
		let side = 1u64 << z;
		ensure!(u64::from(x) < side, "x ({x}) must be < 2^{z}");
		ensure!(u64::from(y) < side, "y ({y}) must be < 2^{z}");
		Ok(TileCoord3 { x, y, z })
	}
}

impl Debug for TileCoord3 {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "TileCoord3({}, {}, {})", self.x, self.y, self.z)
	}
}
