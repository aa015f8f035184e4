//! Content-addressed LRU store of decoded images.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sha2::{Digest, Sha256};

use super::{fit_within, Clock, PixelBuffer, RasterCodec, TickClock};
use crate::error::EngineError;

/// A decoded image held by the cache.
#[derive(Debug, Clone)]
pub struct CachedImage {
    pub id: String,
    pub buffer: Arc<PixelBuffer>,
    pub width: usize,
    pub height: usize,
    pub last_accessed: u64,
}

/// Outcome of [`ImageCache::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub session_id: String,
    pub width: usize,
    pub height: usize,
    /// True when the image was already cached and nothing was decoded.
    pub cached: bool,
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Where a pipeline call gets its pixels from.
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    /// An id returned by an earlier registration.
    Session(&'a str),
    /// Encoded bytes, registered on the fly.
    Bytes { bytes: &'a [u8], max_dim: usize },
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CachedImage>,
    hits: u64,
    misses: u64,
}

/// Bounded, content-addressed store of decoded images.
///
/// One mutex guards the map and counters. Decoding happens outside it, so a
/// slow decode never blocks lookups of other images.
#[derive(Debug)]
pub struct ImageCache {
    inner: Mutex<Inner>,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

/// Session id for `bytes` resized to fit `max_dim`.
///
/// SHA-256 over the bytes, a `|max:` separator and the target; the first
/// 16 bytes of the digest as 32 hex characters.
pub fn cache_key(bytes: &[u8], max_dim: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.update(b"|max:");
    hasher.update(max_dim.to_string().as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

impl ImageCache {
    /// A cache holding at most `capacity` images (at least one).
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(TickClock::new()))
    }

    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
            clock,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // entries stay consistent even if a holder panicked
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decode `bytes` (shrunk to fit `max_dim`) unless already cached.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] when `max_dim` is 0, and whatever the
    /// codec reports for undecodable bytes.
    pub fn register(
        &self,
        bytes: &[u8],
        max_dim: usize,
        codec: &dyn RasterCodec,
    ) -> Result<Registration, EngineError> {
        let (image, cached) = self.register_entry(bytes, max_dim, codec)?;
        Ok(Registration {
            session_id: image.id,
            width: image.width,
            height: image.height,
            cached,
        })
    }

    fn register_entry(
        &self,
        bytes: &[u8],
        max_dim: usize,
        codec: &dyn RasterCodec,
    ) -> Result<(CachedImage, bool), EngineError> {
        if max_dim == 0 {
            return Err(EngineError::invalid("max dimension must be at least 1"));
        }
        let key = cache_key(bytes, max_dim);

        {
            let mut inner = self.lock();
            if let Some(image) = self.touch(&mut inner, &key) {
                inner.hits += 1;
                tracing::debug!(session_id = %key, "Image cache hit");
                return Ok((image, true));
            }
            inner.misses += 1;
        }

        let decoded = codec.decode(bytes)?;
        let (width, height) = fit_within(decoded.width(), decoded.height(), max_dim);
        let buffer = if (width, height) == (decoded.width(), decoded.height()) {
            decoded
        } else {
            tracing::debug!(
                from_width = decoded.width(),
                from_height = decoded.height(),
                width,
                height,
                "Resizing image"
            );
            codec.resize(&decoded, width, height)?
        };

        let mut inner = self.lock();
        // a concurrent registration of the same bytes may have won the race
        if let Some(image) = self.touch(&mut inner, &key) {
            return Ok((image, false));
        }
        let image = CachedImage {
            id: key.clone(),
            width: buffer.width(),
            height: buffer.height(),
            buffer: Arc::new(buffer),
            last_accessed: self.clock.tick(),
        };
        inner.entries.insert(key.clone(), image.clone());
        tracing::debug!(
            session_id = %key,
            width = image.width,
            height = image.height,
            entries = inner.entries.len(),
            "Image cached"
        );
        self.evict(&mut inner);
        Ok((image, false))
    }

    /// Fetch a registered image, refreshing its LRU position.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] for an unknown or evicted id.
    pub fn lookup(&self, id: &str) -> Result<CachedImage, EngineError> {
        let mut inner = self.lock();
        match self.touch(&mut inner, id) {
            Some(image) => {
                inner.hits += 1;
                Ok(image)
            }
            None => {
                inner.misses += 1;
                tracing::debug!(session_id = %id, "Image cache miss");
                Err(EngineError::NotFound(format!(
                    "image session {id} is not cached; register the image first"
                )))
            }
        }
    }

    /// Fetch by session id, or decode inline bytes through [`register`](Self::register).
    pub fn resolve(
        &self,
        source: ImageSource<'_>,
        codec: &dyn RasterCodec,
    ) -> Result<CachedImage, EngineError> {
        match source {
            ImageSource::Session(id) => self.lookup(id),
            ImageSource::Bytes { bytes, max_dim } => {
                self.register_entry(bytes, max_dim, codec).map(|(image, _)| image)
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            entries: inner.entries.len(),
            capacity: self.capacity,
            hits: inner.hits,
            misses: inner.misses,
        }
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        let mut inner = self.lock();
        let dropped = inner.entries.len();
        *inner = Inner::default();
        tracing::debug!(dropped, "Image cache cleared");
    }

    fn touch(&self, inner: &mut Inner, key: &str) -> Option<CachedImage> {
        let entry = inner.entries.get_mut(key)?;
        entry.last_accessed = self.clock.tick();
        Some(entry.clone())
    }

    fn evict(&self, inner: &mut Inner) {
        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner
                .entries
                .values()
                .min_by_key(|e| e.last_accessed)
                .map(|e| e.id.clone())
            else {
                break;
            };
            inner.entries.remove(&oldest);
            tracing::debug!(
                session_id = %oldest,
                entries = inner.entries.len(),
                "Image cache: evicted least recently used entry"
            );
        }
    }
}
