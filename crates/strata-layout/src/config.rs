//! Layout resolution configuration
//!
//! The defaults are the on-disk constants of the format and should only be
//! overridden when analysing files produced by a fork of the writer.

use crate::error::{LayoutError, Result};
use crate::version::{HeaderEra, Version};
use serde::{Deserialize, Serialize};

/// Header size of files written before the patch threshold
pub const OLD_HEADER_SIZE: u64 = 12;

/// Header size of files written at or after the patch threshold
pub const NEW_HEADER_SIZE: u64 = 100;

/// Patch component at which the new header layout starts
pub const ERA_PATCH_THRESHOLD: u32 = 6;

/// Header sizes and era threshold used by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Header size for the old era in bytes
    pub old_header_size: u64,
    /// Header size for the new era in bytes
    pub new_header_size: u64,
    /// Patch components below this value select the old era
    pub era_patch_threshold: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            old_header_size: OLD_HEADER_SIZE,
            new_header_size: NEW_HEADER_SIZE,
            era_patch_threshold: ERA_PATCH_THRESHOLD,
        }
    }
}

impl LayoutConfig {
    /// Create a configuration with the format's default constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the old-era header size
    pub fn with_old_header_size(mut self, size: u64) -> Self {
        self.old_header_size = size;
        self
    }

    /// Set the new-era header size
    pub fn with_new_header_size(mut self, size: u64) -> Self {
        self.new_header_size = size;
        self
    }

    /// Set the patch threshold separating the two eras
    pub fn with_era_patch_threshold(mut self, threshold: u32) -> Self {
        self.era_patch_threshold = threshold;
        self
    }

    /// Load a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LayoutError::InvalidConfig(format!("Failed to parse JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.old_header_size == 0 {
            return Err(LayoutError::InvalidConfig(
                "old_header_size must be greater than 0".to_string(),
            ));
        }

        if self.new_header_size < self.old_header_size {
            return Err(LayoutError::InvalidConfig(format!(
                "new_header_size ({}) must not be smaller than old_header_size ({})",
                self.new_header_size, self.old_header_size
            )));
        }

        Ok(())
    }

    /// Era of a file carrying `version`
    pub const fn era(&self, version: Version) -> HeaderEra {
        HeaderEra::classify(version, self.era_patch_threshold)
    }

    /// Header size in bytes for an era
    pub const fn header_size(&self, era: HeaderEra) -> u64 {
        match era {
            HeaderEra::Old => self.old_header_size,
            HeaderEra::New => self.new_header_size,
        }
    }

    /// Smallest buffer that can hold any header
    pub const fn min_header_size(&self) -> u64 {
        self.old_header_size
    }

    /// Number of leading bytes handed to the header decoder
    ///
    /// Large enough to cover the newest known layout.
    pub const fn decode_window(&self) -> u64 {
        self.new_header_size
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_constants() {
        let config = LayoutConfig::default();
        assert_eq!(config.old_header_size, 12);
        assert_eq!(config.new_header_size, 100);
        assert_eq!(config.era_patch_threshold, 6);
        assert_eq!(config.decode_window(), 100);
        assert_eq!(config.min_header_size(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_header_size_by_version() {
        let config = LayoutConfig::new();
        assert_eq!(config.header_size(config.era(Version::new(1, 0, 5))), 12);
        assert_eq!(config.header_size(config.era(Version::new(1, 0, 6))), 100);
    }

    #[test]
    fn test_validation() {
        let zero = LayoutConfig::new().with_old_header_size(0);
        assert!(matches!(zero.validate(), Err(LayoutError::InvalidConfig(_))));

        let shrinking = LayoutConfig::new()
            .with_old_header_size(64)
            .with_new_header_size(32);
        assert!(matches!(
            shrinking.validate(),
            Err(LayoutError::InvalidConfig(_))
        ));

        let equal = LayoutConfig::new()
            .with_old_header_size(24)
            .with_new_header_size(24);
        assert!(equal.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = LayoutConfig::from_json(r#"{"era_patch_threshold": 9}"#)
            .expect("Partial config should parse");
        assert_eq!(
            config,
            LayoutConfig::default().with_era_patch_threshold(9)
        );
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            LayoutConfig::from_json("not json"),
            Err(LayoutError::InvalidConfig(_))
        ));
        assert!(matches!(
            LayoutConfig::from_json(r#"{"old_header_size": 0}"#),
            Err(LayoutError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = LayoutConfig::new().with_new_header_size(128);
        let json = serde_json::to_string(&config).expect("Serialization should succeed");
        let restored = LayoutConfig::from_json(&json).expect("Deserialization should succeed");
        assert_eq!(config, restored);
    }
}
