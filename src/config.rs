//! Run configuration.
//!
//! Configuration is layered: stock defaults are overridden by an optional
//! TOML file (`--config`), which in turn is overridden by command-line flags.
//! The file is sparse, so it only needs the keys it changes:
//!
//! ```toml
//! size = "300x300"
//!
//! [analysis]
//! strategy = "center"
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! The target size descriptor is kept as the raw string the user supplied
//! because it doubles as the output filename suffix (`photo_580x434.jpg`).

use crate::types::TargetSize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("malformed width/height {descriptor:?}: {reason}")]
    MalformedSize { descriptor: String, reason: String },
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

/// Full configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropperConfig {
    /// Target size descriptor, `<width>x<height>`.
    pub size: String,
    /// Crop analyzer selection.
    pub analysis: AnalysisConfig,
    /// Encoder settings.
    pub encoding: EncodingConfig,
    /// Worker settings.
    pub processing: ProcessingConfig,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            size: TargetSize::DEFAULT_DESCRIPTOR.to_string(),
            analysis: AnalysisConfig::default(),
            encoding: EncodingConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl CropperConfig {
    /// Validate values and return the parsed target size.
    pub fn validate(&self) -> Result<TargetSize, ConfigError> {
        let target = TargetSize::parse(&self.size)?;
        if !(1..=100).contains(&self.encoding.jpeg_quality) {
            return Err(ConfigError::Validation(
                "encoding.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(target)
    }
}

/// Which crop analyzer picks the region to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Score candidate windows by edge detail, skin tone and saturation.
    #[default]
    Saliency,
    /// Take the largest centered window with the target aspect ratio.
    Center,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub strategy: Strategy,
    /// Accept sources smaller than the target and upscale them.
    /// When false, such sources fail analysis.
    pub allow_upscale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    /// JPEG quality (1 = worst, 100 = best). PNG is lossless and ignores it.
    pub jpeg_quality: u8,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self { jpeg_quality: 100 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of files processed at once.
    /// When absent, files are processed one at a time.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective worker count.
///
/// - `None` → 1 (sequential)
/// - `Some(n)` → `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(1)
}

// =============================================================================
// Loading and merging
// =============================================================================

/// Stock defaults as a `toml::Value::Table`, the base layer for merging.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CropperConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto the stock defaults and deserialize.
///
/// Validation is left to the caller, since CLI flags are applied after
/// the file layer.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<CropperConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Load configuration from an optional file path.
pub fn load_config(path: Option<&Path>) -> Result<CropperConfig, ConfigError> {
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(overlay)
}

/// A fully commented config file with every key at its default.
pub fn stock_config_toml() -> &'static str {
    r##"# cropper configuration
# ======================
#
# Pass with `cropper --config cropper.toml <paths>...`.
# Every key is optional; command-line flags override values set here.

# Target size as <width>x<height>. Also used as the output filename
# suffix: photo.jpg -> photo_580x434.jpg
size = "580x434"

[analysis]
# "saliency" scores candidate windows by edge detail, skin tone and
# saturation. "center" keeps the largest centered window.
strategy = "saliency"
# Sources smaller than the target fail unless this is true.
allow_upscale = false

[encoding]
# JPEG quality, 1-100. PNG output is lossless.
jpeg_quality = 100

[processing]
# Number of files processed at once. Omit for sequential processing.
# max_processes = 4
"##
}
