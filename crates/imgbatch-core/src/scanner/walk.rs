use std::path::{Path, PathBuf};
use tracing::{trace, warn};
use walkdir::{DirEntry, WalkDir};

/// A discovered input file and its position relative to the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub relative: PathBuf,
}

/// Filters applied while discovering conversion candidates.
#[derive(Debug, Clone)]
pub struct ScanFilter<'a> {
    pub recursive: bool,
    pub include_png: bool,
    /// Subtree never treated as input, even when it lives under the root.
    pub exclude_dir: Option<&'a Path>,
}

/// Sequential directory traversal in file-name order.
///
/// Walk errors (permission denied, entries vanishing mid-scan) are logged
/// and skipped. Only regular files are yielded; symlinks to files count.
fn walk_files<'a>(
    root: &'a Path,
    recursive: bool,
    exclude_dir: Option<&'a Path>,
) -> impl Iterator<Item = PathBuf> + 'a {
    let max_depth = if recursive { usize::MAX } else { 1 };

    WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry: &DirEntry| match exclude_dir {
            Some(excluded) => !entry.path().starts_with(excluded),
            None => true,
        })
        .filter_map(|entry_result| match entry_result {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .map(DirEntry::into_path)
        .filter(|path| path.is_file())
}

/// Discover the files that `to-png` should convert.
pub fn collect_convert_candidates(root: &Path, filter: &ScanFilter<'_>) -> Vec<SourceFile> {
    walk_files(root, filter.recursive, filter.exclude_dir)
        .filter(|path| filter.include_png || !has_extension(path, &["png"]))
        .filter_map(|path| {
            let relative = match path.strip_prefix(root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => {
                    warn!("{} is outside {}", path.display(), root.display());
                    return None;
                }
            };
            trace!("Candidate {}", relative.display());
            Some(SourceFile { path, relative })
        })
        .collect()
}

/// Regular files under `root`, immediate children only unless `recursive`.
pub fn list_files(root: &Path, recursive: bool) -> Vec<PathBuf> {
    walk_files(root, recursive, None).collect()
}

/// Immediate children of `root` whose extension is in `extensions`
/// (compared case-insensitively, without the leading dot).
pub fn list_files_with_extensions(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let allowed: Vec<&str> = extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.'))
        .collect();
    walk_files(root, false, None)
        .filter(|path| has_extension(path, &allowed))
        .collect()
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false)
}
