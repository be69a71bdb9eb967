use clap::{Args, Parser, Subcommand, ValueEnum};
use imgbatch_core::SortKey;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "imgbatch")]
#[command(about = "Batch image conversion, cropping and renaming", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert images to PNG, keeping the last frame of animations
    ToPng(ToPngArgs),
    /// Center-crop images to a square and resize them in place
    Crop(CropArgs),
    /// Rename files to sequential numbers
    Rename(RenameArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ToPngArgs {
    /// Directory to scan for images
    pub input_dir: PathBuf,
    /// Output directory (default: <INPUT_DIR>/converted_png)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Scan subdirectories too
    #[arg(short, long)]
    pub recursive: bool,
    /// Replace existing PNGs instead of numbering new ones
    #[arg(long)]
    pub overwrite: bool,
    /// Re-encode files that are already PNG
    #[arg(long)]
    pub include_png: bool,
}

#[derive(Debug, Args)]
pub struct CropArgs {
    /// Directory holding the images (default from Config.toml)
    pub target_dir: Option<PathBuf>,
    /// Output edge length in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub size: Option<u32>,
    /// JPEG quality
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Directory whose files are renamed
    pub dir: PathBuf,
    /// Include files in subdirectories
    #[arg(short, long)]
    pub recursive: bool,
    /// First number to assign (default from Config.toml, else 1)
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<i64>,
    /// Sort order before numbering
    #[arg(long, value_enum, default_value_t = SortBy::Name)]
    pub by: SortBy,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortBy {
    /// File name
    Name,
    /// Modification time
    Mtime,
}

impl From<SortBy> for SortKey {
    fn from(value: SortBy) -> Self {
        match value {
            SortBy::Name => SortKey::Name,
            SortBy::Mtime => SortKey::ModifiedTime,
        }
    }
}
