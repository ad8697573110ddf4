use crate::{ElevationEncoding, HeightGrid, Heightmap, TerrainError};
use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use futures::future::join_all;
use std::fmt::Debug;
use swarmtiles_core::Blob;

/// The raster tile fetch capability a [`TerrainCompositor`] runs on.
#[async_trait]
pub trait RasterFetch: Debug + Send + Sync {
	/// Returns the encoded raster bytes of tile `(z, x, y)`, `None` when the
	/// tile does not exist.
	async fn fetch(&self, z: u8, x: u32, y: u32) -> Result<Option<Blob>>;
}

/// Fetches and decodes the 3x3 raster neighborhood around a tile.
///
/// Neighbors are fetched concurrently; one that cannot be fetched or decoded
/// leaves its slot absent. Only the center tile is required, without it the
/// whole composition fails.
#[derive(Debug)]
pub struct TerrainCompositor {
	encoding: ElevationEncoding,
	fetch: Box<dyn RasterFetch>,
}

impl TerrainCompositor {
	/// Creates a compositor decoding pixels with the named elevation
	/// encoding. Unknown tags are rejected here, before any fetch happens.
	pub fn new(encoding: &str, fetch: Box<dyn RasterFetch>) -> Result<TerrainCompositor> {
		Ok(TerrainCompositor {
			encoding: encoding.parse()?,
			fetch,
		})
	}

	pub fn encoding(&self) -> ElevationEncoding {
		self.encoding
	}

	/// Fetches the neighborhood of tile `(z, x, y)` into a [`HeightGrid`].
	///
	/// Neighbor coordinates wrap around the antimeridian in x. Rows above
	/// the first and below the last tile row do not exist, their slots stay
	/// absent.
	pub async fn compose(&self, z: u8, x: u32, y: u32) -> Result<HeightGrid> {
		ensure!(z <= 31, "zoom level {z} exceeds the maximum of 31");
		let side = 1u64 << z;
		ensure!(
			u64::from(x) < side && u64::from(y) < side,
			"tile coordinate {z}/{x}/{y} is out of range"
		);

		let center_blob = self
			.fetch
			.fetch(z, x, y)
			.await
			.context(TerrainError::MissingCenterTile)?
			.ok_or(TerrainError::MissingCenterTile)?;
		let center = Heightmap::from_blob(&center_blob, self.encoding)
			.context(TerrainError::MissingCenterTile)?;

		let neighbors = join_all((0..9).filter(|slot| *slot != 4).map(|slot| async move {
			let Some((nx, ny)) = neighbor_coord(z, x, y, slot) else {
				return (slot, None);
			};
			match self.fetch.fetch(z, nx, ny).await {
				Ok(Some(blob)) => match Heightmap::from_blob(&blob, self.encoding) {
					Ok(map) => (slot, Some(map)),
					Err(error) => {
						log::debug!("dropping neighbor {z}/{nx}/{ny}: {error}");
						(slot, None)
					}
				},
				Ok(None) => (slot, None),
				Err(error) => {
					log::debug!("dropping neighbor {z}/{nx}/{ny}: {error}");
					(slot, None)
				}
			}
		}))
		.await;

		let mut slots: [Option<Heightmap>; 9] = std::array::from_fn(|_| None);
		slots[4] = Some(center);
		for (slot, map) in neighbors {
			slots[slot] = map;
		}
		HeightGrid::new(slots)
	}
}

/// Tile coordinate of neighborhood slot `slot`, `None` when it falls off the
/// top or bottom tile row of the world.
fn neighbor_coord(z: u8, x: u32, y: u32, slot: usize) -> Option<(u32, u32)> {
	let (dx, dy) = ((slot % 3) as i64 - 1, (slot / 3) as i64 - 1);
	let side = 1i64 << z;
	let ny = i64::from(y) + dy;
	if ny < 0 || ny >= side {
		return None;
	}
	let nx = (i64::from(x) + dx).rem_euclid(side);
	Some((nx as u32, ny as u32))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::raster::tests::image_blob;
	use anyhow::bail;
	use std::collections::HashMap;

	#[derive(Debug, Default)]
	struct MapFetch {
		tiles: HashMap<(u8, u32, u32), Blob>,
		fail_on: Option<(u8, u32, u32)>,
	}

	#[async_trait]
	impl RasterFetch for MapFetch {
		async fn fetch(&self, z: u8, x: u32, y: u32) -> Result<Option<Blob>> {
			if self.fail_on == Some((z, x, y)) {
				bail!("socket closed");
			}
			Ok(self.tiles.get(&(z, x, y)).cloned())
		}
	}

	/// A 2x2 terrarium tile whose four heights all equal `height`.
	fn flat_tile(height: u8) -> Blob {
		image_blob(2, 2, |_, _| [128, height, 0])
	}

	#[tokio::test]
	async fn composes_a_full_neighborhood() -> Result<()> {
		let mut tiles = HashMap::new();
		for nx in 2..=4 {
			for ny in 2..=4 {
				tiles.insert((3, nx, ny), flat_tile((nx * 16 + ny) as u8));
			}
		}
		let compositor = TerrainCompositor::new(
			"terrarium",
			Box::new(MapFetch {
				tiles,
				fail_on: None,
			}),
		)?;
		let grid = compositor.compose(3, 3, 3).await?;

		assert_eq!(grid.get(0, 0), f64::from(3 * 16 + 3));
		assert_eq!(grid.get(-1, -1), f64::from(2 * 16 + 2));
		assert_eq!(grid.get(2, 0), f64::from(4 * 16 + 3));
		assert_eq!(grid.get(1, 2), f64::from(3 * 16 + 4));
		Ok(())
	}

	#[tokio::test]
	async fn missing_center_is_fatal() -> Result<()> {
		let compositor = TerrainCompositor::new("terrarium", Box::new(MapFetch::default()))?;
		let error = compositor.compose(3, 3, 3).await.unwrap_err();
		assert_eq!(
			error.downcast_ref::<TerrainError>(),
			Some(&TerrainError::MissingCenterTile)
		);
		Ok(())
	}

	#[tokio::test]
	async fn failing_center_fetch_is_fatal() -> Result<()> {
		let mut fetch = MapFetch::default();
		fetch.tiles.insert((3, 3, 3), flat_tile(7));
		fetch.fail_on = Some((3, 3, 3));
		let compositor = TerrainCompositor::new("terrarium", Box::new(fetch))?;

		let error = compositor.compose(3, 3, 3).await.unwrap_err();
		assert_eq!(
			error.downcast_ref::<TerrainError>(),
			Some(&TerrainError::MissingCenterTile)
		);
		Ok(())
	}

	#[tokio::test]
	async fn broken_neighbors_leave_their_slot_absent() -> Result<()> {
		let mut fetch = MapFetch::default();
		fetch.tiles.insert((3, 3, 3), flat_tile(7));
		// west neighbor delivers garbage, north fails outright
		fetch
			.tiles
			.insert((3, 2, 3), Blob::from(vec![0xde, 0xad, 0xbe, 0xef]));
		fetch.fail_on = Some((3, 3, 2));
		let compositor = TerrainCompositor::new("terrarium", Box::new(fetch))?;
		let grid = compositor.compose(3, 3, 3).await?;

		assert_eq!(grid.get(0, 0), 7.0);
		assert!(grid.get(-1, 0).is_nan());
		assert!(grid.get(0, -1).is_nan());
		Ok(())
	}

	#[tokio::test]
	async fn x_wraps_around_the_antimeridian() -> Result<()> {
		let mut tiles = HashMap::new();
		tiles.insert((1, 0, 0), flat_tile(1));
		tiles.insert((1, 1, 0), flat_tile(2));
		let compositor = TerrainCompositor::new(
			"terrarium",
			Box::new(MapFetch {
				tiles,
				fail_on: None,
			}),
		)?;
		let grid = compositor.compose(1, 0, 0).await?;

		// west of tile x=0 is tile x=1, the world is cyclic in x
		assert_eq!(grid.get(-1, 0), 2.0);
		// north of the first tile row is off the world
		assert!(grid.get(0, -1).is_nan());
		Ok(())
	}

	#[test]
	fn unknown_encoding_is_rejected_before_any_fetch() {
		let error = TerrainCompositor::new("gdal", Box::new(MapFetch::default())).unwrap_err();
		assert_eq!(
			error.downcast_ref::<TerrainError>(),
			Some(&TerrainError::EncodingNotAllowed {
				name: "gdal".to_string()
			})
		);
	}
}
