use crate::ElevationEncoding;
use anyhow::{Result, anyhow, ensure};
use std::fmt;
use swarmtiles_core::Blob;

/// Height samples of one raster tile, row major, y growing downward.
pub struct Heightmap {
	width: u32,
	height: u32,
	values: Vec<f64>,
}

impl Heightmap {
	/// Decodes an image blob into height samples.
	///
	/// The image format is sniffed from the bytes; every format the `image`
	/// crate is compiled with (PNG, JPEG, WebP) is accepted.
	pub fn from_blob(blob: &Blob, encoding: ElevationEncoding) -> Result<Heightmap> {
		let image = image::load_from_memory(blob.as_slice())
			.map_err(|e| anyhow!("failed to decode raster tile: {e}"))?
			.to_rgba8();
		let (width, height) = image.dimensions();
		ensure!(width > 0 && height > 0, "raster tile has no pixels");

		let mut values = Vec::with_capacity((width as usize) * (height as usize));
		for &image::Rgba([r, g, b, _]) in image.pixels() {
			values.push(encoding.decode(r, g, b));
		}
		Ok(Heightmap {
			width,
			height,
			values,
		})
	}

	/// Wraps precomputed height samples, row major.
	pub fn from_values(width: u32, height: u32, values: Vec<f64>) -> Result<Heightmap> {
		ensure!(width > 0 && height > 0, "raster tile has no pixels");
		ensure!(
			values.len() == (width as usize) * (height as usize),
			"expected {} height samples, got {}",
			(width as usize) * (height as usize),
			values.len()
		);
		Ok(Heightmap {
			width,
			height,
			values,
		})
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// Height at a pixel. Panics when `(x, y)` is outside the tile.
	pub fn get(&self, x: u32, y: u32) -> f64 {
		self.values[(y as usize) * (self.width as usize) + (x as usize)]
	}
}

impl fmt::Debug for Heightmap {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Heightmap")
			.field("width", &self.width)
			.field("height", &self.height)
			.finish_non_exhaustive()
	}
}
