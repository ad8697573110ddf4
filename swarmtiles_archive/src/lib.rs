//! Tile archive access.
//!
//! [`TileArchive`] is the boundary to an archive format implementation:
//! header fields, an embedded metadata mapping and per-coordinate tile
//! lookup. [`ArchiveReader`] sits on top and normalizes the metadata
//! (bounds, center, format) before handing it to callers. The [`container`]
//! module ships one concrete format, read through a `ByteRangeSource`.

mod archive;
pub use archive::*;

pub mod container;

mod error;
pub use error::*;

mod header;
pub use header::*;

mod reader;
pub use reader::*;
