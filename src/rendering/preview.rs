//! Indexed PNG previews of a blueprint.
//!
//! The preview paints every pixel with its palette color. Palettes never exceed
//! 256 entries, so the image is always stored as indexed color with the
//! smallest bit depth that fits.

use blueprint_engine::Srgb;

use super::codec::CodecError;

/// Encode `indices` (row-major, one per pixel) against `palette` as PNG.
///
/// The raw encoding uses fast settings and is then handed to oxipng; when
/// optimization fails the raw bytes are returned.
pub fn encode_indexed_png(
    indices: &[u8],
    width: u32,
    height: u32,
    palette: &[Srgb],
) -> Result<Vec<u8>, CodecError> {
    if palette.is_empty() || palette.len() > 256 {
        return Err(CodecError::PngEncode(format!(
            "palette must hold 1 to 256 colors, got {}",
            palette.len()
        )));
    }
    if indices.len() != width as usize * height as usize {
        return Err(CodecError::PngEncode(format!(
            "{} indices for a {width}x{height} image",
            indices.len()
        )));
    }

    let (depth, bits) = match palette.len() {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };
    let plte: Vec<u8> = palette.iter().flat_map(|c| c.to_bytes()).collect();
    let packed = if bits == 8 {
        indices.to_vec()
    } else {
        pack_nbits(indices, width, bits)
    };

    let raw = write_indexed(width, height, depth, &plte, &packed)?;
    Ok(optimize(raw))
}

fn optimize(raw: Vec<u8>) -> Vec<u8> {
    let options = oxipng::Options {
        strip: oxipng::StripChunks::Safe,
        optimize_alpha: false,
        ..Default::default()
    };
    match oxipng::optimize_from_memory(&raw, &options) {
        Ok(smaller) => smaller,
        Err(e) => {
            tracing::debug!(error = %e, "preview left unoptimized");
            raw
        }
    }
}

fn write_indexed(
    width: u32,
    height: u32,
    depth: png::BitDepth,
    plte: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CodecError> {
    let encode_err = |e: png::EncodingError| CodecError::PngEncode(e.to_string());

    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(depth);
    encoder.set_compression(png::Compression::Fast);
    encoder.set_palette(plte);
    let mut writer = encoder.write_header().map_err(encode_err)?;
    writer.write_image_data(data).map_err(encode_err)?;
    writer.finish().map_err(encode_err)?;
    Ok(out)
}

/// Pack palette indices at 1, 2 or 4 bits per pixel, most significant
/// first. Every row starts a fresh byte.
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let per_byte = usize::from(8 / bits);
    let mask = (1u8 << bits) - 1;
    indices
        .chunks(width as usize)
        .flat_map(|row| row.chunks(per_byte))
        .map(|group| {
            group.iter().zip(1u8..).fold(0u8, |byte, (&idx, slot)| {
                byte | ((idx & mask) << (8 - bits * slot))
            })
        })
        .collect()
}
