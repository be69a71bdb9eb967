//! Last-frame-aware conversion of arbitrary images to PNG.
//!
//! The pipeline walks an input tree, decodes every candidate, keeps the last
//! frame of animated inputs, normalizes orientation and color layout, and
//! writes a PNG at the mirrored path under the output directory. Failures are
//! isolated per file; only a missing input directory aborts the run.

pub mod color;
pub mod frame;
#[cfg(feature = "heif")]
pub mod heif;
pub mod output;
pub mod palette;

use crate::codecs::Codecs;
use crate::config::{self, DEFAULT_OUTPUT_DIR_NAME};
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner::{self, ScanFilter, SourceFile};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub use color::{ColorMode, PngMode};
pub use frame::{decode_last_frame, DecodedImage};

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input_dir: PathBuf,
    /// Defaults to `<input_dir>/<output_dir_name>`.
    pub output_dir: Option<PathBuf>,
    pub output_dir_name: String,
    pub recursive: bool,
    pub overwrite: bool,
    pub include_png: bool,
}

impl ConvertOptions {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            output_dir_name: DEFAULT_OUTPUT_DIR_NAME.to_string(),
            recursive: false,
            overwrite: false,
            include_png: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug)]
pub struct ConvertSummary {
    pub scanned: usize,
    pub converted: usize,
    pub output_dir: PathBuf,
    pub failures: Vec<FileFailure>,
    pub duration: Duration,
}

/// Emit the one-time startup warning when HEIC/HEIF cannot be decoded.
pub fn warn_missing_codecs(codecs: Codecs) {
    if !codecs.heif {
        warn!("HEIC/HEIF support is not enabled; .heic/.heif files will fail to open");
    }
}

/// Run the conversion over `options.input_dir`.
pub fn run(
    options: &ConvertOptions,
    codecs: Codecs,
    reporter: &dyn ProgressReporter,
) -> Result<ConvertSummary, Error> {
    let start = Instant::now();

    let input_dir = config::resolve_path(&options.input_dir)
        .map_err(|err| Error::io_at(&options.input_dir, err))?;
    if !input_dir.is_dir() {
        return Err(Error::DirectoryNotFound(input_dir));
    }

    let output_dir = match &options.output_dir {
        Some(dir) => config::resolve_path(dir).map_err(|err| Error::io_at(dir, err))?,
        None => input_dir.join(&options.output_dir_name),
    };
    fs::create_dir_all(&output_dir).map_err(|err| Error::io_at(&output_dir, err))?;
    let output_dir = output_dir.canonicalize().map_err(|err| Error::io_at(&output_dir, err))?;

    info!("Scanning {}", input_dir.display());
    let filter = ScanFilter {
        recursive: options.recursive,
        include_png: options.include_png,
        exclude_dir: Some(output_dir.as_path()),
    };
    let candidates = scanner::collect_convert_candidates(&input_dir, &filter);
    debug!("{} candidates found", candidates.len());
    reporter.on_scan_complete(candidates.len());

    let mut converted = 0;
    let mut failures = Vec::new();

    for source in &candidates {
        reporter.on_file_start(&source.path);
        match convert_file(source, &output_dir, options.overwrite, codecs) {
            Ok(destination) => {
                debug!("{} -> {}", source.path.display(), destination.display());
                converted += 1;
                reporter.on_file_success(&source.path, &destination);
            }
            Err(err) => {
                let error = err.to_string();
                debug!("Conversion of {} failed: {}", source.path.display(), error);
                reporter.on_file_failure(&source.path, &error);
                failures.push(FileFailure {
                    path: source.path.clone(),
                    error,
                });
            }
        }
    }
    reporter.on_finish();

    Ok(ConvertSummary {
        scanned: candidates.len(),
        converted,
        output_dir,
        failures,
        duration: start.elapsed(),
    })
}

/// Convert one candidate and return the path written.
pub fn convert_file(
    source: &SourceFile,
    output_root: &Path,
    overwrite: bool,
    codecs: Codecs,
) -> Result<PathBuf, Error> {
    let decoded = frame::decode_last_frame(&source.path, codecs)?;
    let image = color::normalize(decoded.image, decoded.mode);

    let mut destination = output::destination_path(output_root, &source.relative);
    if !overwrite {
        destination = output::unique_path(&destination);
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|err| Error::io_at(parent, err))?;
    }

    output::write_png(&image, &destination)?;
    Ok(destination)
}
