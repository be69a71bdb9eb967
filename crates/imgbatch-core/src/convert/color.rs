use image::{DynamicImage, ExtendedColorType};

/// Color representation of the source file, before decoding widened it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    Rgba,
    Palette,
    GrayAlpha,
    Cmyk,
    Other,
}

/// The two layouts written to PNG, always 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngMode {
    Rgb,
    Rgba,
}

impl ColorMode {
    /// Classify a decoder's `original_color_type`.
    ///
    /// Indexed sources are widened by their decoders and never show up
    /// here; see [`super::palette`].
    pub fn from_color_type(color: ExtendedColorType) -> Self {
        match color {
            ExtendedColorType::Rgb8 | ExtendedColorType::Rgb16 | ExtendedColorType::Rgb32F => {
                ColorMode::Rgb
            }
            ExtendedColorType::Rgba8
            | ExtendedColorType::Rgba16
            | ExtendedColorType::Rgba32F => ColorMode::Rgba,
            ExtendedColorType::La8 | ExtendedColorType::La16 => ColorMode::GrayAlpha,
            ExtendedColorType::Cmyk8 => ColorMode::Cmyk,
            _ => ColorMode::Other,
        }
    }

    pub fn target(self) -> PngMode {
        match self {
            ColorMode::Rgb => PngMode::Rgb,
            ColorMode::Rgba => PngMode::Rgba,
            ColorMode::Palette | ColorMode::GrayAlpha => PngMode::Rgba,
            ColorMode::Cmyk => PngMode::Rgb,
            ColorMode::Other => PngMode::Rgba,
        }
    }
}

/// Convert `image` to the PNG layout its source mode maps to.
/// Images already in that layout are returned untouched.
pub fn normalize(image: DynamicImage, mode: ColorMode) -> DynamicImage {
    match mode.target() {
        PngMode::Rgb => match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.into_rgb8()),
        },
        PngMode::Rgba => match image {
            DynamicImage::ImageRgba8(_) => image,
            other => DynamicImage::ImageRgba8(other.into_rgba8()),
        },
    }
}
