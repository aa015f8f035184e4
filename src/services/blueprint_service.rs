//! Synchronous operations behind the HTTP API and the CLI.
//!
//! Every method here is CPU-bound. Async callers run them inside
//! `tokio::task::spawn_blocking`.

use std::sync::Arc;

use blueprint_engine::{
    match_thread, sample, Blueprint, BlueprintBuilder, CacheStats, CachedImage, ColorQuery,
    ImageCache, ImageSource, Lab, RasterCodec, Registration, Srgb, ThreadCatalog, ThreadMatch,
};

use crate::error::ApiError;
use crate::models::{AppConfig, BlueprintDefaults};
use crate::rendering::{encode_indexed_png, ImageCodec};

/// Pixels for one request: a cached session or fresh encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    Session(String),
    Encoded {
        bytes: Vec<u8>,
        max_dimension: Option<usize>,
    },
}

/// Per-request overrides of the configured blueprint defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlueprintOptions {
    pub palette_size: Option<usize>,
    pub seed: Option<i64>,
    pub min_region_area: Option<usize>,
    pub merge_small_regions: Option<bool>,
    pub include_preview: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct BlueprintOutput {
    pub blueprint: Blueprint,
    /// Indexed PNG of the label map, when requested.
    pub preview_png: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleOutput {
    pub color: Srgb,
    pub lab: Lab,
    /// `None` when no thread dataset is loaded.
    pub thread: Option<ThreadMatch>,
}

/// Cache, codec and thread catalog shared by all requests.
#[derive(Clone)]
pub struct BlueprintService {
    cache: Arc<ImageCache>,
    codec: Arc<dyn RasterCodec>,
    catalog: Option<Arc<ThreadCatalog>>,
    defaults: BlueprintDefaults,
    max_dimension: usize,
}

impl BlueprintService {
    pub fn new(
        cache: Arc<ImageCache>,
        codec: Arc<dyn RasterCodec>,
        catalog: Option<Arc<ThreadCatalog>>,
        config: &AppConfig,
    ) -> Self {
        Self {
            cache,
            codec,
            catalog,
            defaults: config.blueprint.clone(),
            max_dimension: config.cache.max_dimension,
        }
    }

    /// A service with a fresh cache sized from `config` and the `image` codec.
    pub fn from_config(config: &AppConfig, catalog: Option<Arc<ThreadCatalog>>) -> Self {
        Self::new(
            Arc::new(ImageCache::new(config.cache.capacity)),
            Arc::new(ImageCodec::new()),
            catalog,
            config,
        )
    }

    pub fn catalog(&self) -> Option<&ThreadCatalog> {
        self.catalog.as_deref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn register(
        &self,
        bytes: &[u8],
        max_dimension: Option<usize>,
    ) -> Result<Registration, ApiError> {
        let max_dim = max_dimension.unwrap_or(self.max_dimension);
        let registration = self.cache.register(bytes, max_dim, self.codec.as_ref())?;
        tracing::info!(
            session_id = %registration.session_id,
            width = registration.width,
            height = registration.height,
            cached = registration.cached,
            "Image registered"
        );
        Ok(registration)
    }

    fn resolve(&self, input: &ImageInput) -> Result<CachedImage, ApiError> {
        let source = match input {
            ImageInput::Session(id) => ImageSource::Session(id.as_str()),
            ImageInput::Encoded {
                bytes,
                max_dimension,
            } => ImageSource::Bytes {
                bytes: bytes.as_slice(),
                max_dim: max_dimension.unwrap_or(self.max_dimension),
            },
        };
        Ok(self.cache.resolve(source, self.codec.as_ref())?)
    }

    pub fn blueprint(
        &self,
        input: &ImageInput,
        options: &BlueprintOptions,
    ) -> Result<BlueprintOutput, ApiError> {
        let image = self.resolve(input)?;
        let d = &self.defaults;
        let builder = BlueprintBuilder::new(options.palette_size.unwrap_or(d.palette_size))
            .seed(options.seed.unwrap_or(d.seed))
            .max_iterations(d.max_iterations)
            .min_region_area(options.min_region_area.unwrap_or(d.min_region_area))
            .merge_small_regions(options.merge_small_regions.unwrap_or(d.merge_small_regions))
            .simplify_epsilon(d.simplify_epsilon);

        let blueprint = builder.generate(&image.buffer, self.catalog())?;

        let preview_png = if options.include_preview.unwrap_or(d.include_preview) {
            Some(preview(&blueprint)?)
        } else {
            None
        };

        tracing::info!(
            session_id = %image.id,
            colors = blueprint.palette.len(),
            regions = blueprint.regions.len(),
            preview = preview_png.is_some(),
            "Blueprint generated"
        );

        Ok(BlueprintOutput {
            blueprint,
            preview_png,
        })
    }

    pub fn sample(
        &self,
        input: &ImageInput,
        x: f64,
        y: f64,
        radius: usize,
    ) -> Result<SampleOutput, ApiError> {
        let image = self.resolve(input)?;
        let color = sample(&image.buffer, x, y, radius)?;
        let lab = Lab::from(color);
        Ok(SampleOutput {
            color,
            lab,
            thread: self.catalog().map(|c| c.match_lab(&lab)),
        })
    }

    pub fn match_color(&self, query: &ColorQuery) -> Result<ThreadMatch, ApiError> {
        Ok(match_thread(self.catalog(), query)?)
    }
}

/// Indexed PNG of the blueprint's label map.
pub fn preview(blueprint: &Blueprint) -> Result<Vec<u8>, ApiError> {
    let width = u32::try_from(blueprint.width)
        .map_err(|_| ApiError::Internal("preview width exceeds u32".to_string()))?;
    let height = u32::try_from(blueprint.height)
        .map_err(|_| ApiError::Internal("preview height exceeds u32".to_string()))?;
    Ok(encode_indexed_png(
        &blueprint.preview_indices(),
        width,
        height,
        &blueprint.palette_colors(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_engine::{EngineError, PixelBuffer};
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn split_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([220, 20, 60])
            } else {
                Rgb([30, 60, 200])
            }
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn service(catalog: Option<ThreadCatalog>) -> BlueprintService {
        BlueprintService::from_config(&AppConfig::default(), catalog.map(Arc::new))
    }

    fn small_catalog() -> ThreadCatalog {
        ThreadCatalog::from_entries([
            ("666", "Bright Red", "#E31D42"),
            ("820", "Royal Blue Very Dark", "#0E365C"),
            ("B5200", "Snow White", "#FFFFFF"),
        ])
        .unwrap()
    }

    #[test]
    fn test_register_then_blueprint_by_session() {
        let svc = service(Some(small_catalog()));
        let registration = svc.register(&split_png(20, 20), None).unwrap();
        assert_eq!((registration.width, registration.height), (20, 20));
        assert!(!registration.cached);

        let output = svc
            .blueprint(
                &ImageInput::Session(registration.session_id),
                &BlueprintOptions {
                    palette_size: Some(2),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(output.blueprint.palette.len(), 2);
        assert_eq!(output.blueprint.regions.len(), 2);
        assert!(output.blueprint.palette.iter().all(|p| p.thread.is_some()));
        assert!(output.preview_png.is_some());
    }

    #[test]
    fn test_blueprint_without_preview() {
        let svc = service(None);
        let output = svc
            .blueprint(
                &ImageInput::Encoded {
                    bytes: split_png(8, 8),
                    max_dimension: None,
                },
                &BlueprintOptions {
                    palette_size: Some(2),
                    include_preview: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(output.preview_png.is_none());
        assert!(output.blueprint.palette.iter().all(|p| p.thread.is_none()));
    }

    #[test]
    fn test_unknown_session_is_not_found() {
        let svc = service(None);
        let err = svc
            .blueprint(
                &ImageInput::Session("deadbeef".to_string()),
                &BlueprintOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::Engine(EngineError::NotFound(_))));
    }

    #[test]
    fn test_sample_left_half_matches_red() {
        let svc = service(Some(small_catalog()));
        let input = ImageInput::Encoded {
            bytes: split_png(20, 20),
            max_dimension: None,
        };
        let out = svc.sample(&input, 0.0, 0.5, 2).unwrap();
        assert_eq!(out.color, Srgb::new(220, 20, 60));
        assert_eq!(out.thread.unwrap().best.thread.id, "666");
    }

    #[test]
    fn test_sample_rejects_out_of_range() {
        let svc = service(None);
        let input = ImageInput::Encoded {
            bytes: split_png(4, 4),
            max_dimension: None,
        };
        let err = svc.sample(&input, 1.5, 0.5, 0).unwrap_err();
        assert!(matches!(err, ApiError::Engine(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_match_without_catalog() {
        let err = service(None)
            .match_color(&ColorQuery::hex("#E31D42"))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Engine(EngineError::DatasetUnavailable(_))
        ));
    }

    #[test]
    fn test_preview_encodes_label_map() {
        let buffer = PixelBuffer::filled(3, 2, Srgb::new(10, 200, 30)).unwrap();
        let blueprint = BlueprintBuilder::new(1).generate(&buffer, None).unwrap();
        let png = preview(&blueprint).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([10, 200, 30]));
    }
}
