//! Decoded image storage
//!
//! Interactive clients hit the same photo many times (a palette tweak, a
//! drag across the image sampling colors). The [`ImageCache`] keeps decoded
//! [`PixelBuffer`]s keyed by a hash of their source bytes and resize target
//! so each photo is decoded once, evicting the least recently used entry
//! when full.

mod buffer;
mod clock;
mod codec;
mod sample;
mod store;

pub use buffer::{fit_within, PixelBuffer};
pub use clock::{Clock, TickClock};
pub use codec::RasterCodec;
pub use sample::sample;
pub use store::{cache_key, CacheStats, CachedImage, ImageCache, ImageSource, Registration};
