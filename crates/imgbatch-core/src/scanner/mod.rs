pub mod walk;

pub use walk::{
    collect_convert_candidates, has_extension, list_files, list_files_with_extensions,
    ScanFilter, SourceFile,
};
