//! Booth configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the library directory next to the photos and `library.json`:
//!
//! ```text
//! photos/
//! ├── config.toml     # Optional, overrides stock defaults
//! ├── library.json    # Photo list (managed by photo-lab)
//! ├── photo_0.jpg
//! └── photo_1.jpg
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [library]
//! photo_prefix = "photo_"   # Captured photo names: photo_0.jpg, photo_1.jpg, ...
//! extension = "jpg"         # Captured photo format: "jpg" or "png"
//! jpeg_quality = 90         # JPEG quality (1-100)
//!
//! [capture]
//! tick_interval_ms = 30     # Live preview refresh interval
//! frame_width = 640         # Test-pattern frame size
//! frame_height = 480
//!
//! [display]
//! width = 500               # Preview box; frames are fitted, aspect preserved
//! height = 350
//!
//! [processing]
//! working_size = [0, 0]     # Shrink photos to fit before filtering; 0 = full size
//! max_threads = 4           # Filter worker threads (omit for one per core)
//!
//! [filters.blur]            # Default selection for `apply --defaults`
//! enabled = true            # (one table per filter kind)
//! intensity = 3
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::{FilterKind, FilterSet, Intensity};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file inside the library directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Booth configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoothConfig {
    /// Captured photo naming and encoding.
    pub library: LibraryConfig,
    /// Live preview timing and test-pattern size.
    pub capture: CaptureConfig,
    /// Preview box dimensions.
    pub display: DisplayConfig,
    /// Interactive filtering settings.
    pub processing: ProcessingConfig,
    /// Default filter selections.
    pub filters: FiltersConfig,
}

impl BoothConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library.photo_prefix.is_empty()
            || self.library.photo_prefix.contains(['/', '\\'])
        {
            return Err(ConfigError::Validation(
                "library.photo_prefix must be a non-empty file name prefix".into(),
            ));
        }
        if !matches!(self.library.extension.as_str(), "jpg" | "jpeg" | "png") {
            return Err(ConfigError::Validation(
                "library.extension must be jpg, jpeg or png".into(),
            ));
        }
        if !(1..=100).contains(&self.library.jpeg_quality) {
            return Err(ConfigError::Validation(
                "library.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.capture.tick_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "capture.tick_interval_ms must be non-zero".into(),
            ));
        }
        if self.capture.frame_width == 0 || self.capture.frame_height == 0 {
            return Err(ConfigError::Validation(
                "capture.frame_width and frame_height must be non-zero".into(),
            ));
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Validation(
                "display.width and display.height must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Captured photo naming and encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// File name prefix for captured photos; the list position follows it.
    pub photo_prefix: String,
    /// Extension (and format) for captured photos.
    pub extension: String,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub jpeg_quality: u8,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            photo_prefix: "photo_".to_string(),
            extension: "jpg".to_string(),
            jpeg_quality: 90,
        }
    }
}

/// Live preview settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Milliseconds between two ticks while streaming.
    pub tick_interval_ms: u64,
    /// Width of frames produced by the test-pattern device.
    pub frame_width: u32,
    /// Height of frames produced by the test-pattern device.
    pub frame_height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 30,
            frame_width: 640,
            frame_height: 480,
        }
    }
}

/// Preview box. Frames and photos are fitted inside, aspect preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
}

impl DisplayConfig {
    pub fn bounds(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 350,
        }
    }
}

/// Interactive filtering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Box the working copy is shrunk into before filtering.
    /// `[0, 0]` (or any zero component) keeps full resolution.
    pub working_size: [u32; 2],
    /// Worker threads for per-pixel filter loops. `None` = one per core.
    pub max_threads: Option<usize>,
}

/// Resolve the filter thread count: `min(max_threads, cores)`, or all cores.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map_or(cores, |n| n.clamp(1, cores))
}

/// Resolve the effective working size from config.
///
/// - any zero component → `None` (full resolution)
/// - otherwise → `Some((width, height))`
pub fn effective_working_size(config: &ProcessingConfig) -> Option<(u32, u32)> {
    match config.working_size {
        [0, _] | [_, 0] => None,
        [w, h] => Some((w, h)),
    }
}

/// Default selection for one filter kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterDefault {
    pub enabled: bool,
    /// Clamped to 1-10 when read.
    pub intensity: Intensity,
}

/// Default selections, one table per filter kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FiltersConfig {
    pub grayscale: FilterDefault,
    pub blur: FilterDefault,
    pub brightness: FilterDefault,
    pub contrast: FilterDefault,
    pub sharpen: FilterDefault,
    pub saturation: FilterDefault,
}

impl FiltersConfig {
    pub fn get(&self, kind: FilterKind) -> FilterDefault {
        match kind {
            FilterKind::Grayscale => self.grayscale,
            FilterKind::Blur => self.blur,
            FilterKind::Brightness => self.brightness,
            FilterKind::Contrast => self.contrast,
            FilterKind::Sharpen => self.sharpen,
            FilterKind::Saturation => self.saturation,
        }
    }

    /// Build the [`FilterSet`] these defaults describe.
    pub fn to_filter_set(&self) -> FilterSet {
        let mut set = FilterSet::new();
        for kind in FilterKind::ALL {
            let d = self.get(kind);
            set.set(kind, d.enabled, d.intensity);
        }
        set
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BoothConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BoothConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BoothConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the library directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<BoothConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-lab Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the library directory (next to library.json).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Captured photos
# ---------------------------------------------------------------------------
[library]
# Captured photos are named <prefix><position>.<extension>, where position
# starts at the current list length.
photo_prefix = "photo_"

# "jpg" or "png".
extension = "jpg"

# JPEG quality (1 = worst, 100 = best). Ignored for png.
jpeg_quality = 90

# ---------------------------------------------------------------------------
# Live preview
# ---------------------------------------------------------------------------
[capture]
# Milliseconds between two preview refreshes while streaming.
tick_interval_ms = 30

# Frame size of the built-in test-pattern device.
frame_width = 640
frame_height = 480

# ---------------------------------------------------------------------------
# Preview box
# ---------------------------------------------------------------------------
[display]
# Previews are fitted inside this box; the aspect ratio is preserved.
width = 500
height = 350

# ---------------------------------------------------------------------------
# Filtering
# ---------------------------------------------------------------------------
[processing]
# Photos larger than this box are shrunk before filtering, which keeps
# interactive filtering fast. [0, 0] filters at full resolution.
# "Revert" always returns the photo as loaded, at full resolution.
working_size = [0, 0]

# Worker threads for filtering. Omit to use one per CPU core; larger
# values are capped at the core count.
# max_threads = 4

# ---------------------------------------------------------------------------
# Default filter selections (used by `apply --defaults`)
# ---------------------------------------------------------------------------
# Filters run in this order: grayscale, blur, brightness, contrast,
# sharpen, saturation. Intensity is clamped to 1-10.

[filters.grayscale]
enabled = false
intensity = 1

[filters.blur]
enabled = false
intensity = 1

[filters.brightness]
enabled = false
intensity = 1

[filters.contrast]
enabled = false
intensity = 1

[filters.sharpen]
enabled = false
intensity = 1

[filters.saturation]
enabled = false
intensity = 1
"##
}
