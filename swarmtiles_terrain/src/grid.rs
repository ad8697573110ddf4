use crate::{Heightmap, TerrainError};
use anyhow::Result;
use std::fmt;

/// A 3x3 neighborhood of height tiles around one center tile.
///
/// Slots are laid out row major over the compass directions, index
/// `(dy + 1) * 3 + (dx + 1)`: slot 0 is the north-west neighbor, slot 4 the
/// center, slot 8 the south-east neighbor. Present neighbors share the
/// center's pixel dimensions.
pub struct HeightGrid {
	width: u32,
	height: u32,
	slots: [Option<Heightmap>; 9],
}

impl HeightGrid {
	/// Builds a grid from its slots.
	///
	/// The center slot must be present and sets the pixel dimensions.
	/// Neighbors whose dimensions differ from the center are dropped, they
	/// read as absent afterwards.
	pub fn new(mut slots: [Option<Heightmap>; 9]) -> Result<HeightGrid> {
		let Some(center) = slots[4].as_ref() else {
			return Err(TerrainError::MissingCenterTile.into());
		};
		let (width, height) = (center.width(), center.height());

		for (index, slot) in slots.iter_mut().enumerate() {
			if let Some(map) = slot
				&& (map.width() != width || map.height() != height)
			{
				log::debug!(
					"dropping neighbor slot {index}: {}x{} does not match the center {width}x{height}",
					map.width(),
					map.height()
				);
				*slot = None;
			}
		}

		Ok(HeightGrid {
			width,
			height,
			slots,
		})
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// Height at center-tile pixel coordinates.
	///
	/// Coordinates up to one tile outside `[0, width) x [0, height)` wrap
	/// the out-of-range axis into the matching compass-direction neighbor.
	/// Positions falling into an absent neighbor read as NaN.
	pub fn get(&self, x: i64, y: i64) -> f64 {
		let (width, height) = (i64::from(self.width), i64::from(self.height));
		let slot = (slot_offset(y, height) + 1) * 3 + slot_offset(x, width) + 1;
		match &self.slots[slot as usize] {
			Some(map) => map.get(x.rem_euclid(width) as u32, y.rem_euclid(height) as u32),
			None => f64::NAN,
		}
	}
}

fn slot_offset(value: i64, size: i64) -> i64 {
	if value < 0 {
		-1
	} else if value >= size {
		1
	} else {
		0
	}
}

impl fmt::Debug for HeightGrid {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("HeightGrid")
			.field("width", &self.width)
			.field("height", &self.height)
			.field("present", &self.slots.iter().filter(|s| s.is_some()).count())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Nine 2x2 tiles; tile in slot `s` holds `[s*10, s*10+1, s*10+2, s*10+3]`
	/// as top-left, top-right, bottom-left, bottom-right.
	fn full_grid() -> Result<HeightGrid> {
		let mut slots: [Option<Heightmap>; 9] = std::array::from_fn(|_| None);
		for (s, slot) in slots.iter_mut().enumerate() {
			let base = (s * 10) as f64;
			*slot = Some(Heightmap::from_values(
				2,
				2,
				vec![base, base + 1.0, base + 2.0, base + 3.0],
			)?);
		}
		HeightGrid::new(slots)
	}

	#[test]
	fn wraps_into_the_matching_neighbor() -> Result<()> {
		let grid = full_grid()?;

		// center reads stay in slot 4
		assert_eq!(grid.get(0, 0), 40.0);
		assert_eq!(grid.get(1, 1), 43.0);

		// one step out wraps the offending axis
		assert_eq!(grid.get(-1, -1), 3.0); // bottom-right of the north-west tile
		assert_eq!(grid.get(-1, 0), 31.0); // right column of the west tile
		assert_eq!(grid.get(2, 0), 50.0); // left column of the east tile
		assert_eq!(grid.get(0, 2), 70.0); // top row of the south tile
		assert_eq!(grid.get(2, 2), 80.0); // top-left of the south-east tile
		Ok(())
	}

	#[test]
	fn absent_neighbor_reads_as_nan() -> Result<()> {
		let mut slots: [Option<Heightmap>; 9] = std::array::from_fn(|_| None);
		slots[4] = Some(Heightmap::from_values(2, 2, vec![40.0, 41.0, 42.0, 43.0])?);
		let grid = HeightGrid::new(slots)?;

		assert!(grid.get(-1, -1).is_nan());
		assert!(grid.get(2, 1).is_nan());
		assert_eq!(grid.get(1, 0), 41.0);
		Ok(())
	}

	#[test]
	fn missing_center_is_fatal() {
		let slots: [Option<Heightmap>; 9] = std::array::from_fn(|_| None);
		let error = HeightGrid::new(slots).unwrap_err();
		assert_eq!(
			error.downcast_ref::<TerrainError>(),
			Some(&TerrainError::MissingCenterTile)
		);
	}

	#[test]
	fn mismatched_neighbor_is_dropped() -> Result<()> {
		let mut slots: [Option<Heightmap>; 9] = std::array::from_fn(|_| None);
		slots[4] = Some(Heightmap::from_values(2, 2, vec![0.0; 4])?);
		slots[5] = Some(Heightmap::from_values(3, 3, vec![9.0; 9])?);
		let grid = HeightGrid::new(slots)?;

		assert!(grid.get(2, 0).is_nan());
		Ok(())
	}
}
