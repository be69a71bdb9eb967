pub mod codecs;
pub mod config;
pub mod convert;
pub mod crop;
pub mod error;
pub mod progress;
pub mod rename;
pub mod scanner;

pub use codecs::Codecs;
pub use config::AppConfig;
pub use convert::{ConvertOptions, ConvertSummary, FileFailure};
pub use crop::{CropOptions, CropSummary};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
pub use rename::{RenameOptions, RenameSummary, SortKey};
