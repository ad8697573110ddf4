//! Low-level binary readers and writers for the protobuf wire subset used by
//! vector tiles: varints, zigzag values, field keys and length-delimited data.

mod value_reader;
pub use value_reader::*;

mod value_reader_slice;
pub use value_reader_slice::*;

mod value_writer;
pub use value_writer::*;

mod value_writer_blob;
pub use value_writer_blob::*;
