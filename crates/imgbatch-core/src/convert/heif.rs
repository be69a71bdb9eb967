use crate::convert::color::ColorMode;
use crate::error::Error;
use image::{DynamicImage, RgbImage, RgbaImage};
use libheif_rs::{ColorSpace, HeifContext, ImageHandle, ItemId, LibHeif, RgbChroma};
use std::path::Path;
use tracing::debug;

fn heif_error(err: libheif_rs::HeifError) -> Error {
    Error::Heif(err.to_string())
}

/// Decode the last top-level image of a HEIF container.
///
/// libheif applies the container's rotation and mirroring itself, so the
/// result needs no further orientation handling.
pub fn decode_last_image(path: &Path) -> Result<(DynamicImage, ColorMode), Error> {
    let path_str = path
        .to_str()
        .ok_or_else(|| Error::Heif(format!("non UTF-8 path {}", path.display())))?;
    let context = HeifContext::read_from_file(path_str).map_err(heif_error)?;
    let handle = last_image_handle(&context)?;

    let has_alpha = handle.has_alpha_channel();
    let chroma = if has_alpha {
        RgbChroma::Rgba
    } else {
        RgbChroma::Rgb
    };

    let lib_heif = LibHeif::new();
    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(chroma), None)
        .map_err(heif_error)?;
    let planes = decoded.planes();
    let plane = planes
        .interleaved
        .ok_or_else(|| Error::Heif("decoded image has no interleaved plane".to_string()))?;

    let channels = if has_alpha { 4 } else { 3 };
    let row_len = plane.width as usize * channels;
    let mut pixels = Vec::with_capacity(row_len * plane.height as usize);
    for row in plane.data.chunks(plane.stride).take(plane.height as usize) {
        pixels.extend_from_slice(&row[..row_len]);
    }

    let buffer_error = || Error::Heif("pixel buffer size mismatch".to_string());
    if has_alpha {
        let buffer = RgbaImage::from_raw(plane.width, plane.height, pixels).ok_or_else(buffer_error)?;
        Ok((DynamicImage::ImageRgba8(buffer), ColorMode::Rgba))
    } else {
        let buffer = RgbImage::from_raw(plane.width, plane.height, pixels).ok_or_else(buffer_error)?;
        Ok((DynamicImage::ImageRgb8(buffer), ColorMode::Rgb))
    }
}

/// Handle of the last top-level image, falling back to the primary image
/// when the last one cannot be opened.
fn last_image_handle(context: &HeifContext) -> Result<ImageHandle, Error> {
    let count = context.number_of_top_level_images();
    if count > 1 {
        let mut ids: Vec<ItemId> = vec![0; count];
        let filled = context.top_level_image_ids(&mut ids);
        if let Some(last_id) = ids.get(filled.saturating_sub(1)) {
            match context.image_handle(*last_id) {
                Ok(handle) => return Ok(handle),
                Err(err) => debug!("Last HEIF image unreadable, using primary: {}", err),
            }
        }
    }
    context.primary_image_handle().map_err(heif_error)
}
