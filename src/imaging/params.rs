//! Parameter types for the filter pipeline.
//!
//! These structs describe *what* to apply, not *how*. They are the interface
//! between whoever chooses filters (the CLI, a config file, a GUI shell) and
//! the [`pipeline`](super::pipeline) that does the pixel work.
//!
//! ## Types
//!
//! - [`Intensity`]: filter strength (1–10, default 1). Clamped on construction and on deserialization.
//! - [`FilterKind`]: the six filters, declared in pipeline order.
//! - [`FilterSpec`]: one `(kind, enabled, intensity)` selection.
//! - [`FilterSet`]: exactly one [`FilterSpec`] per kind, iterated in pipeline order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter strength, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 10;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX) as u8)
    }

    pub fn value(self) -> u32 {
        self.0 as u32
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(1)
    }
}

impl From<u32> for Intensity {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Intensity> for u32 {
    fn from(intensity: Intensity) -> Self {
        intensity.value()
    }
}

/// The filters the pipeline knows about.
///
/// Declaration order is pipeline order: each enabled filter consumes the
/// output of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Grayscale,
    Blur,
    Brightness,
    Contrast,
    Sharpen,
    Saturation,
}

impl FilterKind {
    /// All kinds in pipeline order.
    pub const ALL: [FilterKind; 6] = [
        FilterKind::Grayscale,
        FilterKind::Blur,
        FilterKind::Brightness,
        FilterKind::Contrast,
        FilterKind::Sharpen,
        FilterKind::Saturation,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Grayscale => "grayscale",
            FilterKind::Blur => "blur",
            FilterKind::Brightness => "brightness",
            FilterKind::Contrast => "contrast",
            FilterKind::Sharpen => "sharpen",
            FilterKind::Saturation => "saturation",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single filter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub enabled: bool,
    pub intensity: Intensity,
}

impl FilterSpec {
    pub fn disabled(kind: FilterKind) -> Self {
        Self {
            kind,
            enabled: false,
            intensity: Intensity::default(),
        }
    }
}

/// One [`FilterSpec`] per [`FilterKind`].
///
/// Specs are stored by kind, so there can never be duplicates, and iteration
/// always follows pipeline order no matter in which order selections were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    specs: [FilterSpec; 6],
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            specs: FilterKind::ALL.map(FilterSpec::disabled),
        }
    }
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: FilterKind) -> &FilterSpec {
        &self.specs[kind.slot()]
    }

    /// Replace the selection for `kind`.
    pub fn set(&mut self, kind: FilterKind, enabled: bool, intensity: Intensity) {
        self.specs[kind.slot()] = FilterSpec {
            kind,
            enabled,
            intensity,
        };
    }

    /// Enable `kind` at the given intensity.
    pub fn enable(&mut self, kind: FilterKind, intensity: Intensity) -> &mut Self {
        self.set(kind, true, intensity);
        self
    }

    /// Disable `kind`, keeping its intensity for when it is re-enabled.
    pub fn disable(&mut self, kind: FilterKind) -> &mut Self {
        self.specs[kind.slot()].enabled = false;
        self
    }

    /// All specs in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterSpec> {
        self.specs.iter()
    }

    /// Enabled specs in pipeline order.
    pub fn enabled(&self) -> impl Iterator<Item = &FilterSpec> {
        self.specs.iter().filter(|s| s.enabled)
    }

    /// True when applying this set cannot change an image.
    pub fn is_identity(&self) -> bool {
        self.enabled().next().is_none()
    }
}
