use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR_NAME: &str = "converted_png";
pub const DEFAULT_CROP_TARGET_DIR: &str = "src/assets/photos";
pub const DEFAULT_CROP_SIZE: u32 = 512;
pub const DEFAULT_CROP_QUALITY: u8 = 95;
pub const DEFAULT_CROP_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "webp"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub convert: ConvertSettings,
    pub crop: CropSettings,
    pub rename: RenameSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConvertSettings {
    /// Name of the output directory created under the input directory
    /// when no explicit output directory is given.
    pub output_dir_name: String,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            output_dir_name: DEFAULT_OUTPUT_DIR_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CropSettings {
    pub target_dir: String,
    pub size: u32,
    pub quality: u8,
    pub extensions: Vec<String>,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            target_dir: DEFAULT_CROP_TARGET_DIR.to_string(),
            size: DEFAULT_CROP_SIZE,
            quality: DEFAULT_CROP_QUALITY,
            extensions: DEFAULT_CROP_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenameSettings {
    pub start: i64,
}

impl Default for RenameSettings {
    fn default() -> Self {
        Self { start: 1 }
    }
}

/// Load `Config.toml` from the working directory, if present, with
/// `IMGBATCH__SECTION__KEY` environment overrides on top.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    load_configuration_from(Path::new("Config"))
}

pub fn load_configuration_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::from(path).required(false))
        .add_source(Environment::with_prefix("IMGBATCH").separator("__"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Expand `~` and make the path absolute against the working directory.
/// Existing paths are canonicalized so prefix comparisons are exact.
pub fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let expanded = expand_home(path);
    match expanded.canonicalize() {
        Ok(canonical) => Ok(canonical),
        Err(err) if err.kind() == io::ErrorKind::NotFound => std::path::absolute(&expanded),
        Err(err) => Err(err),
    }
}
