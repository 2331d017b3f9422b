//! Header analysis and region layout resolution
//!
//! A file consists of three consecutive regions:
//!
//! ```text
//! 0             header_size         records_end               file_size
//! ├── header ───┼──── records ──────┼──── details ────────────┤
//! ```
//!
//! `records_end` is read from the header itself. The header size is not: it
//! is a fixed constant selected by the era of the version embedded in the
//! header (12 bytes for old files, 100 bytes for new ones).

use crate::config::LayoutConfig;
use crate::decoder::{HeaderDecoder, RawHeader};
use crate::error::{LayoutError, Result};
use crate::version::{HeaderEra, Version};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, trace, warn};

/// Resolved region layout of one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// Total length of the file in bytes
    pub file_size: u64,
    /// Length of the fixed header
    pub header_size: u64,
    /// Length of the records area
    pub records_size: u64,
    /// Length of the trailing details area
    pub details_size: u64,
    /// Version decoded from the header
    pub version: Version,
    /// Header layout selected by the version
    pub era: HeaderEra,
}

impl HeaderInfo {
    /// Derive region sizes from the header-declared end of the records area
    ///
    /// Fails when the records area would end before the header does or after
    /// the file does. Sizes are never clamped.
    pub fn compute(
        file_size: u64,
        header_size: u64,
        records_end: u64,
        version: Version,
        era: HeaderEra,
    ) -> Result<Self> {
        let inconsistent = || LayoutError::LayoutInconsistency {
            header_size,
            records_end,
            file_size,
        };

        let records_size = records_end.checked_sub(header_size).ok_or_else(inconsistent)?;
        let details_size = file_size.checked_sub(records_end).ok_or_else(inconsistent)?;

        Ok(Self {
            file_size,
            header_size,
            records_size,
            details_size,
            version,
            era,
        })
    }

    /// Offset of the first byte of the records area
    pub const fn records_offset(&self) -> u64 {
        self.header_size
    }

    /// Offset of the first byte of the details area
    ///
    /// Saturates for layouts that were not produced by [`Self::compute`];
    /// use [`Self::validate`] before trusting such a layout.
    pub const fn details_offset(&self) -> u64 {
        self.header_size.saturating_add(self.records_size)
    }

    /// Byte range of the header
    pub const fn header_range(&self) -> Range<usize> {
        0..self.header_size as usize
    }

    /// Byte range of the records area
    pub const fn records_range(&self) -> Range<usize> {
        self.records_offset() as usize..self.details_offset() as usize
    }

    /// Byte range of the details area
    pub const fn details_range(&self) -> Range<usize> {
        self.details_offset() as usize..self.file_size as usize
    }

    /// Check that the three regions tile the file exactly
    pub const fn is_consistent(&self) -> bool {
        match self.header_size.checked_add(self.records_size) {
            Some(records_end) => match records_end.checked_add(self.details_size) {
                Some(total) => total == self.file_size,
                None => false,
            },
            None => false,
        }
    }

    /// Check that this layout tiles a buffer of `buffer_len` bytes
    ///
    /// Layouts built outside [`Self::compute`] (deserialized, or assembled
    /// from public fields) must pass this before being used to slice a buffer.
    pub fn validate(&self, buffer_len: usize) -> Result<()> {
        if self.is_consistent() && self.file_size == buffer_len as u64 {
            return Ok(());
        }

        warn!(
            "Layout header={} records={} details={} file={} does not tile a {} byte buffer",
            self.header_size, self.records_size, self.details_size, self.file_size, buffer_len
        );

        Err(LayoutError::LayoutInconsistency {
            header_size: self.header_size,
            records_end: self.details_offset(),
            file_size: buffer_len as u64,
        })
    }
}

/// Decodes file headers and resolves region layouts
///
/// Holds only the injected header decoder and an immutable configuration, so
/// a single analyzer can serve any number of buffers, concurrently if the
/// decoder allows it.
#[derive(Debug)]
pub struct HeaderAnalyzer<H> {
    decoder: H,
    config: LayoutConfig,
}

impl<H: HeaderDecoder> HeaderAnalyzer<H> {
    /// Create an analyzer with the format's default constants
    pub fn new(decoder: H) -> Self {
        Self {
            decoder,
            config: LayoutConfig::default(),
        }
    }

    /// Create an analyzer with a custom configuration
    pub fn with_config(decoder: H, config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { decoder, config })
    }

    /// Configuration in use
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Injected header decoder
    pub const fn decoder(&self) -> &H {
        &self.decoder
    }

    /// Decode the header of `buffer` and compute its region layout
    pub fn resolve_layout(&self, buffer: &[u8]) -> Result<HeaderInfo> {
        let file_size = buffer.len() as u64;
        let min_size = self.config.min_header_size();

        if file_size < min_size {
            return Err(LayoutError::TruncatedInput {
                needed: min_size,
                available: file_size,
            });
        }

        let window_len = file_size.min(self.config.decode_window()) as usize;
        let header = self
            .decoder
            .decode(&buffer[..window_len])
            .map_err(LayoutError::header_decode)?;

        let version = header.file_version();
        let records_end = header.header_record_size_lo();
        let era = self.config.era(version);
        let header_size = self.config.header_size(era);

        trace!(
            "Version {} classified as {} era, header size {}",
            version, era, header_size
        );

        let info = HeaderInfo::compute(file_size, header_size, records_end, version, era)
            .inspect_err(|_| {
                warn!(
                    "Header declares records end at {} outside [{}, {}]",
                    records_end, header_size, file_size
                );
            })?;

        debug!(
            "Resolved layout: file={} header={} records={} details={} version={}",
            info.file_size, info.header_size, info.records_size, info.details_size, info.version
        );

        Ok(info)
    }
}
