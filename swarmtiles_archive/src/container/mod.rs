//! The `swarmtiles` container format: a fixed header, tile payloads, an
//! embedded metadata mapping and a coordinate index, all addressed by byte
//! ranges so the container can live behind any
//! [`ByteRangeSource`](swarmtiles_source::ByteRangeSource).

mod file_header;
pub use file_header::*;

mod metadata;
pub use metadata::*;

mod reader;
pub use reader::*;

mod tile_index;
pub use tile_index::*;

mod writer;
pub use writer::*;
