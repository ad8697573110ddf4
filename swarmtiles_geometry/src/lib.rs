//! Geometry model and Mapbox Vector Tile codec.
//!
//! The typed model lives at the crate root: [`GeoValue`] property values,
//! [`GeoProperties`] mappings, the [`Geometry`] sum type and [`GeoFeature`].
//! The [`vector_tile`] module turns features into byte-exact MVT blobs and
//! back.

mod error;
mod geo;
pub mod vector_tile;

pub use error::*;
pub use geo::*;
