//! Byte-exact Mapbox Vector Tile encoder and decoder.
//!
//! A [`VectorTile`] is a list of [`VectorTileLayer`]s; each layer carries
//! its features plus the per-layer key/value interning tables. Layers
//! built through [`VectorTileLayer::from_features`] encode
//! deterministically: tables grow in first-use order and the field layout
//! is fixed.

mod feature;
mod geometry_type;
mod interner;
mod layer;
mod tile;
mod value;

pub use feature::*;
pub use geometry_type::*;
pub use interner::*;
pub use layer::*;
pub use tile::*;
pub use value::*;
