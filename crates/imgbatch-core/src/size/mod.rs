//! Image geometry resolution.
//!
//! Turns a job's optional preset tag and optional custom `WIDTHxHEIGHT`
//! string into the canonical size sent to the service. A custom size always
//! wins over a preset; with neither, the 1:1 preset is used.

mod preset;
mod validate;

use std::fmt;

pub use preset::SizePreset;
pub use validate::{
    parse_size, validate_custom_size, DIVISOR, MAX_DIMENSION, MAX_TOTAL_PIXELS, MIN_DIMENSION,
};

use validate::group_thousands;

/// Which side of the image a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Width => f.write_str("Width"),
            Dimension::Height => f.write_str("Height"),
        }
    }
}

/// A validated geometry. `Display` yields the canonical `WIDTHxHEIGHT` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    pub width: u64,
    pub height: u64,
}

impl SizeSpec {
    pub fn total_pixels(&self) -> u64 {
        self.width * self.height
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<SizePreset> for SizeSpec {
    fn from(preset: SizePreset) -> Self {
        // The preset table is static and always well-formed.
        let (width, height) = parse_size(preset.canonical_size()).unwrap_or((1280, 1280));
        SizeSpec { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizeError {
    #[error("Invalid size format: \"{0}\". Use \"WIDTHxHEIGHT\" format (e.g., \"1280x1280\")")]
    Format(String),
    #[error("{dimension} {value}px is out of range. Must be {}-{}px", MIN_DIMENSION, MAX_DIMENSION)]
    OutOfRange { dimension: Dimension, value: u64 },
    #[error("{dimension} {value}px must be divisible by {}. Suggested: {suggested}px", DIVISOR)]
    NotDivisible {
        dimension: Dimension,
        value: u64,
        suggested: u64,
    },
    #[error(
        "Total pixels ({}) exceeds maximum ({})",
        group_thousands(.total),
        group_thousands(&MAX_TOTAL_PIXELS)
    )]
    TooManyPixels { total: u64 },
    #[error("Invalid size preset: \"{tag}\". Valid presets: {valid}")]
    UnknownPreset { tag: String, valid: String },
}

/// Resolves the size for one job.
///
/// An empty custom string counts as absent. Resolution with neither input
/// never fails.
pub fn resolve_size(preset: Option<&str>, custom: Option<&str>) -> Result<SizeSpec, SizeError> {
    if let Some(custom) = custom.filter(|s| !s.is_empty()) {
        return validate_custom_size(custom);
    }
    if let Some(tag) = preset.filter(|s| !s.is_empty()) {
        let preset: SizePreset = tag.parse()?;
        return Ok(preset.into());
    }
    Ok(SizePreset::Square.into())
}
