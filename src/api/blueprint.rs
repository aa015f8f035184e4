use axum::{extract::State, Json};
use base64::Engine;
use blueprint_engine::{BBox, Lab, PaletteEntry, Region};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::images::ImageRef;
use super::threads::ThreadMatchBody;
use super::extract::ApiJson;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::{BlueprintOptions, BlueprintOutput};

/// Request body for blueprint generation; omitted options use config defaults
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BlueprintRequest {
    #[serde(flatten)]
    pub image: ImageRef,
    /// Number of clusters, 1..=256
    #[serde(default)]
    pub palette_size: Option<usize>,
    #[serde(default)]
    pub seed: Option<i64>,
    /// Regions smaller than this many pixels are absorbed by a neighbor
    #[serde(default)]
    pub min_region_area: Option<usize>,
    #[serde(default)]
    pub merge_small_regions: Option<bool>,
    /// Attach a base64 indexed PNG of the label map
    #[serde(default)]
    pub include_preview: Option<bool>,
}

impl BlueprintRequest {
    fn options(&self) -> BlueprintOptions {
        BlueprintOptions {
            palette_size: self.palette_size,
            seed: self.seed,
            min_region_area: self.min_region_area,
            merge_small_regions: self.merge_small_regions,
            include_preview: self.include_preview,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaletteColorBody {
    pub index: usize,
    #[schema(value_type = Vec<u8>)]
    pub rgb: [u8; 3],
    pub hex: String,
    /// L, a, b rounded to two decimals
    #[schema(value_type = Vec<f64>)]
    pub lab: [f64; 3],
    /// Pixels of this color after region cleanup
    pub count: usize,
    pub percent: f64,
    pub dmc_match: Option<ThreadMatchBody>,
}

impl From<&PaletteEntry> for PaletteColorBody {
    fn from(entry: &PaletteEntry) -> Self {
        Self {
            index: entry.index,
            rgb: entry.rgb.to_bytes(),
            hex: entry.hex.clone(),
            lab: rounded_lab(&entry.lab),
            count: entry.count,
            percent: entry.percent,
            dmc_match: entry.thread.as_ref().map(Into::into),
        }
    }
}

/// Region bounds with exclusive maxima
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct BBoxBody {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl From<BBox> for BBoxBody {
    fn from(b: BBox) -> Self {
        Self {
            x0: b.x0,
            y0: b.y0,
            x1: b.x1,
            y1: b.y1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionBody {
    pub label_index: usize,
    pub area_px: usize,
    pub bbox: BBoxBody,
    /// Closed outlines as `[x, y]` points, first equal to last
    #[schema(value_type = Vec<Vec<Vec<i32>>>)]
    pub contours: Vec<Vec<[i32; 2]>>,
}

impl From<&Region> for RegionBody {
    fn from(region: &Region) -> Self {
        Self {
            label_index: region.label_index,
            area_px: region.area_px,
            bbox: region.bbox.into(),
            contours: region
                .contours
                .iter()
                .map(|c| c.points.iter().map(|p| [p.x, p.y]).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlueprintResponse {
    pub width: usize,
    pub height: usize,
    pub palette: Vec<PaletteColorBody>,
    pub regions: Vec<RegionBody>,
    /// Base64 indexed PNG, one palette entry per cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_png: Option<String>,
}

impl From<&BlueprintOutput> for BlueprintResponse {
    fn from(output: &BlueprintOutput) -> Self {
        let blueprint = &output.blueprint;
        Self {
            width: blueprint.width,
            height: blueprint.height,
            palette: blueprint.palette.iter().map(Into::into).collect(),
            regions: blueprint.regions.iter().map(Into::into).collect(),
            preview_png: output
                .preview_png
                .as_ref()
                .map(|png| base64::engine::general_purpose::STANDARD.encode(png)),
        }
    }
}

pub(crate) fn rounded_lab(lab: &Lab) -> [f64; 3] {
    let round2 = |v: f64| (v * 100.0).round() / 100.0;
    [round2(lab.l), round2(lab.a), round2(lab.b)]
}

/// Generate a paint-by-number blueprint
///
/// Quantizes the image in LAB space, splits it into connected regions, merges
/// regions below `min_region_area` and outlines each region.
#[utoipa::path(
    post,
    path = "/api/blueprint",
    request_body = BlueprintRequest,
    responses(
        (status = 200, description = "Blueprint generated", body = BlueprintResponse),
        (status = 400, description = "Invalid options"),
        (status = 404, description = "Unknown session id"),
        (status = 422, description = "Image could not be decoded"),
    ),
    tag = "Blueprint"
)]
pub async fn handle_blueprint(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BlueprintRequest>,
) -> Result<Json<BlueprintResponse>, ApiError> {
    let options = request.options();
    let input = request.image.into_input()?;
    let service = state.service.clone();

    let output =
        tokio::task::spawn_blocking(move || service.blueprint(&input, &options)).await??;

    Ok(Json(BlueprintResponse::from(&output)))
}
