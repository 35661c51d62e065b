//! Aspect-ratio presets and their canonical sizes.

use std::fmt;
use std::str::FromStr;

use super::SizeError;

/// Named aspect-ratio shortcut recommended by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizePreset {
    Square,
    Landscape3x2,
    Portrait2x3,
    Landscape4x3,
    Portrait3x4,
    Wide16x9,
    Tall9x16,
}

impl SizePreset {
    /// All presets in the order they are listed to users.
    pub const ALL: [SizePreset; 7] = [
        SizePreset::Square,
        SizePreset::Landscape3x2,
        SizePreset::Portrait2x3,
        SizePreset::Landscape4x3,
        SizePreset::Portrait3x4,
        SizePreset::Wide16x9,
        SizePreset::Tall9x16,
    ];

    /// The tag users type, e.g. `"16:9"`.
    pub fn tag(self) -> &'static str {
        match self {
            SizePreset::Square => "1:1",
            SizePreset::Landscape3x2 => "3:2",
            SizePreset::Portrait2x3 => "2:3",
            SizePreset::Landscape4x3 => "4:3",
            SizePreset::Portrait3x4 => "3:4",
            SizePreset::Wide16x9 => "16:9",
            SizePreset::Tall9x16 => "9:16",
        }
    }

    /// Canonical `WIDTHxHEIGHT` sent to the service.
    ///
    /// These come from the service's recommendation table and are not run
    /// through custom-size validation (960 is below the custom minimum).
    pub fn canonical_size(self) -> &'static str {
        match self {
            SizePreset::Square => "1280x1280",
            SizePreset::Landscape3x2 => "1568x1056",
            SizePreset::Portrait2x3 => "1056x1568",
            SizePreset::Landscape4x3 => "1472x1088",
            SizePreset::Portrait3x4 => "1088x1472",
            SizePreset::Wide16x9 => "1728x960",
            SizePreset::Tall9x16 => "960x1728",
        }
    }

    /// Comma-separated list of every tag, for error messages and help text.
    pub fn valid_tags() -> String {
        Self::ALL
            .iter()
            .map(|p| p.tag())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SizePreset {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.tag() == s)
            .ok_or_else(|| SizeError::UnknownPreset {
                tag: s.to_string(),
                valid: Self::valid_tags(),
            })
    }
}
