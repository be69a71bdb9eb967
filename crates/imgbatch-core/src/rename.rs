//! Rename files to consecutive numbers.
//!
//! Renaming happens in two phases: every file first moves to a unique
//! temporary name in its own directory, then each temporary file moves to
//! its final number. Target names can therefore never collide with a file
//! that has not been renamed yet.

use crate::config;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};
use uuid::Uuid;

const TEMP_PREFIX: &str = ".__tmp__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    ModifiedTime,
}

#[derive(Debug, Clone)]
pub struct RenameOptions {
    pub dir: PathBuf,
    pub recursive: bool,
    /// First number assigned; zero and negative values are allowed.
    pub start: i64,
    pub sort_by: SortKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Default)]
pub struct RenameSummary {
    pub renamed: Vec<RenamedFile>,
}

/// Number every file under `options.dir` in sort order.
pub fn run(options: &RenameOptions, reporter: &dyn ProgressReporter) -> Result<RenameSummary, Error> {
    let root = config::resolve_path(&options.dir).map_err(|err| Error::io_at(&options.dir, err))?;
    if !root.is_dir() {
        return Err(Error::DirectoryNotFound(root));
    }

    let files = sorted_files(&root, options.recursive, options.sort_by)?;
    if files.is_empty() {
        info!("No files found in {}", root.display());
        return Ok(RenameSummary::default());
    }
    if last_number(options.start, files.len()).is_none() {
        return Err(Error::Other(format!(
            "numbering {} files from {} overflows",
            files.len(),
            options.start
        )));
    }
    reporter.on_scan_complete(files.len());

    // Phase 1: move everything out of the way.
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
    for original in files {
        let temp = original.with_file_name(temp_file_name(&original));
        fs::rename(&original, &temp).map_err(|err| Error::io_at(&original, err))?;
        debug!("{} -> {}", original.display(), temp.display());
        staged.push((original, temp));
    }

    // Phase 2: assign final numbers in sort order.
    let mut renamed = Vec::with_capacity(staged.len());
    for (offset, (original, temp)) in staged.into_iter().enumerate() {
        // Bounded by the `last_number` check above.
        let index = options.start + offset as i64;
        let target = original.with_file_name(numbered_file_name(index, &original));
        fs::rename(&temp, &target).map_err(|err| Error::io_at(&temp, err))?;

        let entry = RenamedFile {
            from: original,
            to: target,
        };
        reporter.on_file_success(&entry.from, &entry.to);
        renamed.push(entry);
    }
    reporter.on_finish();

    Ok(RenameSummary { renamed })
}

/// Number given to the last of `count` files, if it fits in an `i64`.
fn last_number(start: i64, count: usize) -> Option<i64> {
    let steps = i64::try_from(count.saturating_sub(1)).ok()?;
    start.checked_add(steps)
}

fn sorted_files(root: &Path, recursive: bool, sort_by: SortKey) -> Result<Vec<PathBuf>, Error> {
    let files = scanner::list_files(root, recursive);

    match sort_by {
        SortKey::Name => {
            let mut files = files;
            files.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
            Ok(files)
        }
        SortKey::ModifiedTime => {
            let mut keyed: Vec<(SystemTime, PathBuf)> = files
                .into_iter()
                .map(|path| -> Result<(SystemTime, PathBuf), Error> {
                    let modified = fs::metadata(&path)
                        .and_then(|metadata| metadata.modified())
                        .map_err(|err| Error::io_at(&path, err))?;
                    Ok((modified, path))
                })
                .collect::<Result<_, _>>()?;
            keyed.sort();
            Ok(keyed.into_iter().map(|(_, path)| path).collect())
        }
    }
}

/// Suffix of `path` including the dot, or empty.
fn dotted_extension(path: &Path) -> OsString {
    let mut suffix = OsString::new();
    if let Some(extension) = path.extension() {
        suffix.push(".");
        suffix.push(extension);
    }
    suffix
}

fn temp_file_name(path: &Path) -> OsString {
    let mut name = OsString::from(format!("{}{}", TEMP_PREFIX, Uuid::new_v4().simple()));
    name.push(dotted_extension(path));
    name
}

fn numbered_file_name(index: i64, path: &Path) -> OsString {
    let mut name = OsString::from(index.to_string());
    name.push(dotted_extension(path));
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_name_keeps_last_suffix() {
        assert_eq!(numbered_file_name(3, Path::new("/d/photo.JPG")), OsString::from("3.JPG"));
        assert_eq!(numbered_file_name(1, Path::new("/d/a.tar.gz")), OsString::from("1.gz"));
        assert_eq!(numbered_file_name(7, Path::new("/d/README")), OsString::from("7"));
        assert_eq!(numbered_file_name(2, Path::new("/d/.hidden")), OsString::from("2"));
    }

    #[test]
    fn test_last_number_bounds() {
        assert_eq!(last_number(1, 3), Some(3));
        assert_eq!(last_number(-2, 2), Some(-1));
        assert_eq!(last_number(i64::MAX, 1), Some(i64::MAX));
        assert_eq!(last_number(i64::MAX, 2), None);
        assert_eq!(numbered_file_name(-1, Path::new("/d/a.png")), OsString::from("-1.png"));
    }

    #[test]
    fn test_temp_name_is_hidden_and_unique() {
        let a = temp_file_name(Path::new("x.png"));
        let b = temp_file_name(Path::new("x.png"));
        let a_str = a.to_string_lossy();
        assert!(a_str.starts_with(".__tmp__"));
        assert!(a_str.ends_with(".png"));
        assert_eq!(a_str.len(), ".__tmp__".len() + 32 + ".png".len());
        assert_ne!(a, b);
    }
}
