//! Byte-range sources over local files, ranged HTTP endpoints and BitTorrent
//! swarms.
//!
//! All variants satisfy the same contract: `read_range(offset, length)`
//! returns exactly `length` bytes or fails, never a partial result. Sources
//! are created per archive, shared across concurrent tile requests, and
//! closed explicitly.

mod classify;
pub use classify::*;

mod error;
pub use error::*;

mod file;
pub use file::*;

mod http;
pub use http::*;

mod source;
pub use source::*;

mod torrent;
pub use torrent::*;
