//! Shared primitives: byte buffers, tile coordinates and formats, geographic
//! bounding boxes, a size-capped cache, and protobuf value readers/writers.

pub mod io;

pub mod macros;

pub mod types;

pub use types::*;
