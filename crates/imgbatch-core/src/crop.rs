//! Center-crop images to a square and resize them in place.

use crate::config::{self, CropSettings};
use crate::convert::FileFailure;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct CropOptions {
    pub target_dir: PathBuf,
    pub size: u32,
    /// JPEG quality, 1-100.
    pub quality: u8,
    pub extensions: Vec<String>,
}

impl CropOptions {
    pub fn from_settings(settings: &CropSettings) -> Self {
        Self {
            target_dir: PathBuf::from(&settings.target_dir),
            size: settings.size,
            quality: settings.quality,
            extensions: settings.extensions.clone(),
        }
    }
}

#[derive(Debug)]
pub struct CropSummary {
    pub processed: usize,
    pub failures: Vec<FileFailure>,
}

pub fn run(options: &CropOptions, reporter: &dyn ProgressReporter) -> Result<CropSummary, Error> {
    if options.size == 0 {
        return Err(Error::Other("crop size must be at least 1 pixel".to_string()));
    }

    let target_dir = config::resolve_path(&options.target_dir)
        .map_err(|err| Error::io_at(&options.target_dir, err))?;
    if !target_dir.is_dir() {
        return Err(Error::DirectoryNotFound(target_dir));
    }

    info!("Cropping images in {}", target_dir.display());
    let files = scanner::list_files_with_extensions(&target_dir, &options.extensions);
    reporter.on_scan_complete(files.len());

    let mut failures = Vec::new();
    for path in &files {
        reporter.on_file_start(path);
        match crop_file(path, options.size, options.quality) {
            Ok(()) => reporter.on_file_success(path, path),
            Err(err) => {
                let error = err.to_string();
                debug!("Cropping {} failed: {}", path.display(), error);
                reporter.on_file_failure(path, &error);
                failures.push(FileFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }
    reporter.on_finish();

    Ok(CropSummary {
        processed: files.len(),
        failures,
    })
}

/// Crop, resize and overwrite a single file, keeping its format.
///
/// The new image is encoded in memory first, so a failed encode leaves
/// the original untouched.
pub fn crop_file(path: &Path, size: u32, quality: u8) -> Result<(), Error> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .or_else(|| ImageFormat::from_path(path).ok())
        .ok_or_else(|| Error::Other(format!("unknown image format: {}", path.display())))?;

    let image = reader.decode()?;
    let square = square_resize(drop_alpha(image), size);

    let mut buffer = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            square.write_with_encoder(encoder)?;
        }
        other => square.write_to(&mut buffer, other)?,
    }

    fs::write(path, buffer.into_inner()).map_err(|err| Error::io_at(path, err))?;
    Ok(())
}

/// RGBA inputs are flattened to RGB; other layouts are kept.
fn drop_alpha(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgba8(_)
        | DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgb8(image.into_rgb8()),
        other => other,
    }
}

/// Center-crop to the shortest side, then Lanczos3-resize to `size`².
pub fn square_resize(image: DynamicImage, size: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    let side = width.min(height);
    let left = (width - side) / 2;
    let top = (height - side) / 2;

    image
        .crop_imm(left, top, side, side)
        .resize_exact(size, size, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_square_resize_landscape_keeps_center() {
        // Left and right thirds red, middle third green.
        let image = RgbImage::from_fn(30, 10, |x, _| {
            if (10..20).contains(&x) {
                Rgb([0, 255, 0])
            } else {
                Rgb([255, 0, 0])
            }
        });
        let result = square_resize(DynamicImage::ImageRgb8(image), 4);

        assert_eq!((result.width(), result.height()), (4, 4));
        let center = result.to_rgb8().get_pixel(2, 2).0;
        assert!(center[1] > 200 && center[0] < 50, "center was {:?}", center);
    }

    #[test]
    fn test_square_resize_portrait() {
        let image = DynamicImage::new_rgb8(6, 20);
        let result = square_resize(image, 8);
        assert_eq!((result.width(), result.height()), (8, 8));
    }

    #[test]
    fn test_drop_alpha_only_for_rgba() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 4])));
        assert_eq!(drop_alpha(rgba).color(), image::ColorType::Rgb8);

        let gray = DynamicImage::new_luma_a8(1, 1);
        assert_eq!(drop_alpha(gray).color(), image::ColorType::La8);
    }
}
