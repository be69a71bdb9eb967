use crate::codecs::{self, Codecs};
use crate::convert::color::ColorMode;
use crate::convert::palette;
use crate::error::Error;
use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::metadata::Orientation;
use image::{AnimationDecoder, DynamicImage, Frames, ImageDecoder, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// A decoded source image, ready for color normalization.
#[derive(Debug)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub mode: ColorMode,
    /// Index of the frame kept; 0 for still images.
    pub frame_index: usize,
}

/// Decode `path`, keeping the last frame of animated inputs and applying
/// any embedded orientation.
pub fn decode_last_frame(path: &Path, codecs: Codecs) -> Result<DecodedImage, Error> {
    if codecs.heif && codecs::is_heif_path(path) {
        return decode_heif(path);
    }

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format();

    match format {
        Some(ImageFormat::Gif) => {
            let decoder = GifDecoder::new(reader.into_inner())?;
            // GIF frames are always palette-indexed and carry no orientation.
            decode_animation(path, decoder.into_frames(), ColorMode::Palette, None)
        }
        Some(ImageFormat::Png) => {
            let mut decoder = PngDecoder::new(reader.into_inner())?;
            if decoder.is_apng()? {
                let orientation = read_orientation(&mut decoder);
                let frames = decoder.apng()?.into_frames();
                decode_animation(path, frames, ColorMode::Rgba, Some(orientation))
            } else {
                decode_single(decoder, palette::has_palette(path, ImageFormat::Png))
            }
        }
        Some(ImageFormat::WebP) => {
            let mut decoder = WebPDecoder::new(reader.into_inner())?;
            if decoder.has_animation() {
                let orientation = read_orientation(&mut decoder);
                decode_animation(path, decoder.into_frames(), ColorMode::Rgba, Some(orientation))
            } else {
                decode_single(decoder, false)
            }
        }
        _ => {
            let indexed = format.is_some_and(|format| palette::has_palette(path, format));
            decode_single(reader.into_decoder()?, indexed)
        }
    }
}

fn decode_single(mut decoder: impl ImageDecoder, indexed: bool) -> Result<DecodedImage, Error> {
    let mode = if indexed {
        ColorMode::Palette
    } else {
        ColorMode::from_color_type(decoder.original_color_type())
    };
    let orientation = read_orientation(&mut decoder);
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);

    Ok(DecodedImage {
        image,
        mode,
        frame_index: 0,
    })
}

fn decode_animation(
    path: &Path,
    frames: Frames<'_>,
    mode: ColorMode,
    orientation: Option<Orientation>,
) -> Result<DecodedImage, Error> {
    match select_last_frame(frames) {
        Some((frame_index, buffer)) => {
            let mut image = DynamicImage::ImageRgba8(buffer);
            if let Some(orientation) = orientation {
                image.apply_orientation(orientation);
            }
            debug!("Kept frame {} of {}", frame_index, path.display());
            Ok(DecodedImage {
                image,
                mode,
                frame_index,
            })
        }
        None => {
            // Not even the first frame decoded; let the still-image path
            // produce the real error (or the default frame).
            debug!("No animation frame readable in {}", path.display());
            let reader = ImageReader::new(BufReader::new(File::open(path)?)).with_guessed_format()?;
            decode_single(reader.into_decoder()?, mode == ColorMode::Palette)
        }
    }
}

/// Walk the frames to the end and keep the last one.
///
/// A frame that fails to decode stops the walk; the previous frame is kept.
pub fn select_last_frame(frames: Frames<'_>) -> Option<(usize, image::RgbaImage)> {
    let mut selected = None;

    for (index, frame) in frames.enumerate() {
        match frame {
            Ok(frame) => selected = Some((index, frame.into_buffer())),
            Err(err) => {
                debug!("Frame {} unreadable, keeping the previous frame: {}", index, err);
                break;
            }
        }
    }

    selected
}

fn read_orientation(decoder: &mut impl ImageDecoder) -> Orientation {
    decoder.orientation().unwrap_or_else(|err| {
        debug!("Orientation metadata unreadable: {}", err);
        Orientation::NoTransforms
    })
}

#[cfg(feature = "heif")]
fn decode_heif(path: &Path) -> Result<DecodedImage, Error> {
    let (image, mode) = super::heif::decode_last_image(path)?;
    Ok(DecodedImage {
        image,
        mode,
        frame_index: 0,
    })
}

#[cfg(not(feature = "heif"))]
fn decode_heif(path: &Path) -> Result<DecodedImage, Error> {
    Err(Error::Heif(format!(
        "{}: HEIF support is not built in",
        path.display()
    )))
}
