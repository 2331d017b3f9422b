//! File format version triple and header era classification

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Format version embedded in the file header
///
/// Ordering is lexicographic on (major, minor, patch), which is what the
/// derived `Ord` gives with this field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
    /// Patch component, which selects the header era
    pub patch: u32,
}

impl Version {
    /// Create a version from its components
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl From<[u8; 3]> for Version {
    fn from(ver: [u8; 3]) -> Self {
        Self::new(u32::from(ver[0]), u32::from(ver[1]), u32::from(ver[2]))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Error returned when a version string is not `major.minor.patch`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid version string: {0:?}")]
pub struct ParseVersionError(String);

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let mut next = || {
            parts
                .next()
                .and_then(|p| p.parse::<u32>().ok())
                .ok_or_else(|| ParseVersionError(s.to_string()))
        };

        let version = Self::new(next()?, next()?, next()?);

        if parts.next().is_some() {
            return Err(ParseVersionError(s.to_string()));
        }

        Ok(version)
    }
}

/// Historical header layout a file was written with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderEra {
    /// Narrow header written before the patch threshold
    Old,
    /// Widened header; records and details framing is unchanged
    New,
}

impl HeaderEra {
    /// Classify a version against a patch threshold
    ///
    /// Patch components strictly below the threshold select the old layout,
    /// everything else (including the threshold itself) the new one.
    pub const fn classify(version: Version, patch_threshold: u32) -> Self {
        if version.patch < patch_threshold {
            Self::Old
        } else {
            Self::New
        }
    }
}

impl std::fmt::Display for HeaderEra {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Old => write!(f, "old"),
            Self::New => write!(f, "new"),
        }
    }
}
