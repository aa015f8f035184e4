//! Raster input and output: decoding uploads and encoding blueprint previews.

pub mod codec;
pub mod preview;

pub use codec::{CodecError, ImageCodec};
pub use preview::encode_indexed_png;
