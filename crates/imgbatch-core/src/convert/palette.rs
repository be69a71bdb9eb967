//! Palette detection from container headers.
//!
//! Decoders expand indexed pixels before reporting a color type, so an
//! indexed PNG looks like plain RGB by the time it is decoded. The header
//! is read separately to recover the source layout.

use crate::error::Error;
use image::codecs::bmp::BmpDecoder;
use image::ImageFormat;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tiff::tags::{PhotometricInterpretation, Tag};
use tracing::debug;

/// Whether `path` stores palette indices rather than color samples.
///
/// Unreadable headers count as "no palette"; the decoder reports the real
/// error afterwards.
pub fn has_palette(path: &Path, format: ImageFormat) -> bool {
    let result = match format {
        ImageFormat::Png => png_is_indexed(path),
        ImageFormat::Bmp => bmp_has_palette(path),
        ImageFormat::Tiff => tiff_is_palette(path),
        _ => return false,
    };

    result.unwrap_or_else(|err| {
        debug!("Palette check of {} failed: {}", path.display(), err);
        false
    })
}

fn open(path: &Path) -> Result<BufReader<File>, Error> {
    let file = File::open(path).map_err(|err| Error::io_at(path, err))?;
    Ok(BufReader::new(file))
}

fn png_is_indexed(path: &Path) -> Result<bool, Error> {
    let reader = png::Decoder::new(open(path)?).read_info()?;
    Ok(reader.info().color_type == png::ColorType::Indexed)
}

fn bmp_has_palette(path: &Path) -> Result<bool, Error> {
    let decoder = BmpDecoder::new(open(path)?)?;
    Ok(decoder.get_palette().is_some())
}

fn tiff_is_palette(path: &Path) -> Result<bool, Error> {
    let mut decoder = tiff::decoder::Decoder::new(open(path)?)?;
    let photometric = decoder.find_tag_unsigned::<u16>(Tag::PhotometricInterpretation)?;
    Ok(photometric == Some(PhotometricInterpretation::RGBPalette.to_u16()))
}
