use std::path::Path;

/// Optional decoders compiled into this build.
///
/// Probed once at startup and passed down to the pipelines, so the
/// "HEIF unavailable" warning and the HEIF decode path read the same flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codecs {
    pub heif: bool,
}

impl Codecs {
    pub fn detect() -> Self {
        Self {
            heif: cfg!(feature = "heif"),
        }
    }

    /// A build without any optional decoder.
    pub fn baseline() -> Self {
        Self { heif: false }
    }
}

pub fn is_heif_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "heic" | "heif" | "heics" | "heifs" | "hif"
            )
        })
        .unwrap_or(false)
}
