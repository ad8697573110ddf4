//! Contour vector tiles from RGB-encoded raster elevation tiles.
//!
//! A [`TerrainCompositor`] fetches a 3x3 neighborhood of raster tiles through
//! a [`RasterFetch`] capability and decodes them into a [`HeightGrid`]. The
//! [`ContourPipeline`] runs marching squares over that grid at a ladder of
//! elevation thresholds and encodes the isoline polygons as a single vector
//! tile layer.

mod compositor;
mod contour;
mod encoding;
mod error;
mod grid;
mod pipeline;
mod raster;

pub use compositor::*;
pub use encoding::*;
pub use error::*;
pub use grid::*;
pub use pipeline::*;
pub use raster::*;
