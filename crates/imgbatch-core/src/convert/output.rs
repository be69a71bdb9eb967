use crate::error::Error;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Mirror `relative` under `output_root` with a `.png` extension.
pub fn destination_path(output_root: &Path, relative: &Path) -> PathBuf {
    output_root.join(relative).with_extension("png")
}

/// First free path among `path`, `stem_1.ext`, `stem_2.ext`, …
pub fn unique_path(path: &Path) -> PathBuf {
    if !is_occupied(path) {
        return path.to_path_buf();
    }

    let stem = path.file_stem().unwrap_or_default();
    let extension = path.extension();
    let mut counter: u64 = 1;

    loop {
        let mut name = OsString::from(stem);
        name.push(format!("_{}", counter));
        if let Some(extension) = extension {
            name.push(".");
            name.push(extension);
        }

        let candidate = path.with_file_name(name);
        if !is_occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

// Dangling symlinks count as occupied.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Encode `image` as PNG with maximum compression and adaptive filtering.
///
/// A partially written file is removed when encoding fails.
pub fn write_png(image: &DynamicImage, path: &Path) -> Result<(), Error> {
    let file = File::create(path).map_err(|err| Error::io_at(path, err))?;
    let mut writer = BufWriter::new(file);

    let result = image
        .write_with_encoder(PngEncoder::new_with_quality(
            &mut writer,
            CompressionType::Best,
            FilterType::Adaptive,
        ))
        .map_err(Error::from)
        .and_then(|()| writer.flush().map_err(|err| Error::io_at(path, err)));

    if result.is_err() {
        drop(writer);
        if let Err(err) = fs::remove_file(path) {
            debug!("Could not remove partial output {}: {}", path.display(), err);
        }
    }

    result
}
