//! Value types: byte buffers and ranges, coordinates, formats, bounding boxes.

mod blob;
pub use blob::*;

mod byte_range;
pub use byte_range::*;

mod geo_bbox;
pub use geo_bbox::*;

mod geo_center;
pub use geo_center::*;

mod limited_cache;
pub use limited_cache::*;

mod tile_coord;
pub use tile_coord::*;

mod tile_type;
pub use tile_type::*;
