use crate::contour::contour_polygons;
use crate::{HeightGrid, TerrainCompositor};
use anyhow::{Result, ensure};
use swarmtiles_core::Blob;
use swarmtiles_geometry::vector_tile::{VectorTile, VectorTileLayer};
use swarmtiles_geometry::{GeoFeature, Geometry};

/// Pixels of neighbor data padded around the center tile before contouring,
/// the seam that keeps rings closed across tile borders.
const MARGIN: usize = 1;

/// Renders contour vector tiles from composed height grids.
///
/// One rendered tile holds a single layer with one multi-polygon feature
/// per elevation threshold, each carrying an `elevation` property. The
/// threshold ladder climbs from above the lowest sample to the highest in
/// steps of `step`.
#[derive(Debug)]
pub struct ContourPipeline {
	compositor: TerrainCompositor,
	layer_name: String,
	extent: u32,
	step: f64,
}

impl ContourPipeline {
	pub fn new(
		compositor: TerrainCompositor,
		layer_name: &str,
		extent: u32,
		step: f64,
	) -> Result<ContourPipeline> {
		ensure!(extent > 0, "tile extent must not be zero");
		ensure!(
			step.is_finite() && step > 0.0,
			"contour step must be positive, got {step}"
		);
		Ok(ContourPipeline {
			compositor,
			layer_name: layer_name.to_string(),
			extent,
			step,
		})
	}

	/// Composes the raster neighborhood of `(z, x, y)` and renders its
	/// contour tile.
	pub async fn render_tile(&self, z: u8, x: u32, y: u32) -> Result<Blob> {
		let grid = self.compositor.compose(z, x, y).await?;
		self.render_grid(&grid)
	}

	/// Contours a composed grid and encodes the polygons as a single-layer
	/// vector tile. A grid without a threshold ladder (flat or all NaN)
	/// still yields the layer, with no features.
	pub fn render_grid(&self, grid: &HeightGrid) -> Result<Blob> {
		let padded_width = grid.width() as usize + 2 * MARGIN;
		let padded_height = grid.height() as usize + 2 * MARGIN;
		let mut values = Vec::with_capacity(padded_width * padded_height);
		for y in 0..padded_height {
			for x in 0..padded_width {
				values.push(grid.get(x as i64 - MARGIN as i64, y as i64 - MARGIN as i64));
			}
		}

		let mut features = Vec::new();
		for threshold in thresholds(&values, self.step) {
			let polygons = contour_polygons(&values, padded_width, padded_height, threshold);
			if polygons.is_empty() {
				continue;
			}
			let polygons = polygons
				.into_iter()
				.map(|rings| {
					rings
						.into_iter()
						.map(|ring| self.project_ring(ring, grid))
						.collect()
				})
				.collect();
			let mut feature = GeoFeature::new(Geometry::new_multi_polygon(polygons));
			feature.set_property("elevation".to_string(), threshold);
			features.push(feature);
		}

		let layer = VectorTileLayer::from_features(self.layer_name.clone(), features, self.extent)?;
		VectorTile::new(vec![layer]).to_blob()
	}

	/// Maps one contour ring from padded grid coordinates onto `[0, extent]`
	/// tile space, clamping float overshoot onto the tile edge.
	fn project_ring(&self, mut ring: Vec<[f64; 2]>, grid: &HeightGrid) -> Vec<[f64; 2]> {
		let extent = f64::from(self.extent);
		let margin = MARGIN as f64;
		let (width, height) = (f64::from(grid.width()), f64::from(grid.height()));
		for point in &mut ring {
			point[0] = ((point[0] - margin) / width * extent).clamp(0.0, extent);
			point[1] = ((point[1] - margin) / height * extent).clamp(0.0, extent);
		}
		// contour rings wind for d3's y-down convention, the tile codec
		// expects the opposite, one reversal flips exterior and hole alike
		ring.reverse();
		ring
	}
}

/// The threshold ladder: `min + step`, `min + 2 * step`, .. up to and
/// including `max`. NaN samples do not take part in min/max.
fn thresholds(values: &[f64], step: f64) -> Vec<f64> {
	let mut min = f64::INFINITY;
	let mut max = f64::NEG_INFINITY;
	for &value in values {
		if value.is_nan() {
			continue;
		}
		min = min.min(value);
		max = max.max(value);
	}
	if min > max {
		return Vec::new();
	}
	(1..)
		.map(|rung| min + step * f64::from(rung))
		.take_while(|threshold| *threshold <= max)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::raster::tests::image_blob;
	use crate::{Heightmap, RasterFetch, TerrainError};
	use async_trait::async_trait;
	use pretty_assertions::assert_eq;
	use std::collections::HashMap;
	use swarmtiles_geometry::{GeoValue, ring_area};

	#[derive(Debug)]
	struct NoFetch;

	#[async_trait]
	impl RasterFetch for NoFetch {
		async fn fetch(&self, _z: u8, _x: u32, _y: u32) -> Result<Option<Blob>> {
			Ok(None)
		}
	}

	fn pipeline(step: f64) -> Result<ContourPipeline> {
		let compositor = TerrainCompositor::new("mapbox", Box::new(NoFetch))?;
		ContourPipeline::new(compositor, "contours", 4096, step)
	}

	/// A 4x4 center tile at 100 m with a 300 m bump in the middle 2x2,
	/// no neighbors.
	fn bump_grid() -> Result<HeightGrid> {
		let mut values = vec![100.0; 16];
		for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
			values[y * 4 + x] = 300.0;
		}
		let mut slots: [Option<Heightmap>; 9] = std::array::from_fn(|_| None);
		slots[4] = Some(Heightmap::from_values(4, 4, values)?);
		HeightGrid::new(slots)
	}

	#[test]
	fn thresholds_climb_from_above_the_minimum() {
		assert_eq!(thresholds(&[0.0, 10.0, 25.0], 10.0), vec![10.0, 20.0]);
		// max is included when the ladder lands on it exactly
		assert_eq!(thresholds(&[0.0, 20.0], 10.0), vec![10.0, 20.0]);
	}

	#[test]
	fn thresholds_ignore_nan_and_degenerate_input() {
		assert_eq!(
			thresholds(&[f64::NAN, 5.0, f64::NAN, 6.0], 0.5),
			vec![5.5, 6.0]
		);
		assert!(thresholds(&[f64::NAN, f64::NAN], 10.0).is_empty());
		assert!(thresholds(&[], 10.0).is_empty());
		assert!(thresholds(&[7.0], 10.0).is_empty());
	}

	#[test]
	fn renders_one_feature_per_threshold() -> Result<()> {
		let blob = pipeline(100.0)?.render_grid(&bump_grid()?)?;
		let tile = VectorTile::from_blob(&blob)?;

		assert_eq!(tile.layers.len(), 1);
		let layer = &tile.layers[0];
		assert_eq!(layer.name, "contours");
		assert_eq!(layer.version, 2);
		assert_eq!(layer.extent, 4096);

		let features = layer.to_features()?;
		assert_eq!(features.len(), 2);
		assert_eq!(
			features[0].properties.get("elevation"),
			Some(&GeoValue::F64(200.0))
		);
		assert_eq!(
			features[1].properties.get("elevation"),
			Some(&GeoValue::F64(300.0))
		);
		Ok(())
	}

	#[test]
	fn contours_stay_inside_the_tile_and_wind_for_the_codec() -> Result<()> {
		let blob = pipeline(100.0)?.render_grid(&bump_grid()?)?;
		let tile = VectorTile::from_blob(&blob)?;
		let features = tile.layers[0].to_features()?;
		assert!(!features.is_empty());

		for feature in &features {
			let Geometry::MultiPolygon(polygons) = &feature.geometry else {
				panic!("expected a multi-polygon, got {:?}", feature.geometry);
			};
			assert!(!polygons.is_empty());
			for polygon in polygons {
				assert!(ring_area(&polygon[0]) > 0.0);
				for ring in polygon {
					for point in ring {
						assert!((0.0..=4096.0).contains(&point[0]), "x out of tile: {point:?}");
						assert!((0.0..=4096.0).contains(&point[1]), "y out of tile: {point:?}");
					}
				}
			}
		}
		Ok(())
	}

	#[test]
	fn a_flat_grid_yields_an_empty_layer() -> Result<()> {
		let mut slots: [Option<Heightmap>; 9] = std::array::from_fn(|_| None);
		slots[4] = Some(Heightmap::from_values(2, 2, vec![42.0; 4])?);
		let grid = HeightGrid::new(slots)?;

		let blob = pipeline(10.0)?.render_grid(&grid)?;
		let tile = VectorTile::from_blob(&blob)?;

		assert_eq!(tile.layers.len(), 1);
		assert_eq!(tile.layers[0].name, "contours");
		assert!(tile.layers[0].features.is_empty());
		Ok(())
	}

	#[test]
	fn rejects_nonsense_parameters() -> Result<()> {
		let compositor = || TerrainCompositor::new("mapbox", Box::new(NoFetch));
		assert!(ContourPipeline::new(compositor()?, "contours", 0, 100.0).is_err());
		assert!(ContourPipeline::new(compositor()?, "contours", 4096, 0.0).is_err());
		assert!(ContourPipeline::new(compositor()?, "contours", 4096, -5.0).is_err());
		assert!(ContourPipeline::new(compositor()?, "contours", 4096, f64::NAN).is_err());
		Ok(())
	}

	#[derive(Debug)]
	struct MapFetch {
		tiles: HashMap<(u8, u32, u32), Blob>,
	}

	#[async_trait]
	impl RasterFetch for MapFetch {
		async fn fetch(&self, z: u8, x: u32, y: u32) -> Result<Option<Blob>> {
			Ok(self.tiles.get(&(z, x, y)).cloned())
		}
	}

	#[tokio::test]
	async fn renders_a_tile_end_to_end() -> Result<()> {
		// flat 100 m neighborhood, the center tile carries a 200 m bump
		let flat = image_blob(4, 4, |_, _| [128, 100, 0]);
		let bump = image_blob(4, 4, |x, y| {
			if (1..=2).contains(&x) && (1..=2).contains(&y) {
				[128, 200, 0]
			} else {
				[128, 100, 0]
			}
		});
		let mut tiles = HashMap::new();
		for nx in 0..=2 {
			for ny in 0..=2 {
				tiles.insert((2, nx, ny), flat.clone());
			}
		}
		tiles.insert((2, 1, 1), bump);

		let compositor = TerrainCompositor::new("terrarium", Box::new(MapFetch { tiles }))?;
		let pipeline = ContourPipeline::new(compositor, "relief", 4096, 50.0)?;

		let tile = VectorTile::from_blob(&pipeline.render_tile(2, 1, 1).await?)?;
		let layer = tile.find_layer("relief").expect("layer must exist");
		let features = layer.to_features()?;

		assert_eq!(features.len(), 2);
		assert_eq!(
			features[0].properties.get("elevation"),
			Some(&GeoValue::F64(150.0))
		);
		assert_eq!(
			features[1].properties.get("elevation"),
			Some(&GeoValue::F64(200.0))
		);
		Ok(())
	}

	#[tokio::test]
	async fn a_missing_center_tile_fails_the_render() -> Result<()> {
		let compositor = TerrainCompositor::new("terrarium", Box::new(NoFetch))?;
		let pipeline = ContourPipeline::new(compositor, "relief", 4096, 50.0)?;

		let error = pipeline.render_tile(2, 1, 1).await.unwrap_err();
		assert_eq!(
			error.downcast_ref::<TerrainError>(),
			Some(&TerrainError::MissingCenterTile)
		);
		Ok(())
	}
}
