//! Region layout resolution for versioned header/records/details files
//!
#![allow(clippy::cast_possible_truncation)] // Offsets originate from usize buffer lengths
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
//! Files handled by this crate consist of three consecutive regions: a fixed
//! header, a variable-length records area, and a trailing details area. The
//! header carries a version triple whose patch component selects one of two
//! historical header layouts, and the absolute offset at which the records
//! area ends.
//!
//! # Components
//!
//! - **[`HeaderAnalyzer`]**: decodes the header through an injected
//!   [`HeaderDecoder`], classifies the era, and derives a [`HeaderInfo`]
//! - **[`FileInfoAggregator`]**: composes the layout with an injected
//!   [`RecordParser`] and [`DetailsDecoder`]
//!
//! # Example
//!
//! ```rust
//! use strata_layout::{
//!     FileInfoAggregator, HeaderAnalyzer, HeaderDecoder, RawDetailsDecoder, RawHeaderFields,
//!     Version,
//!     records::{ParsedRecords, RecordParser},
//!     HeaderInfo,
//! };
//!
//! struct FixedHeader;
//!
//! impl HeaderDecoder for FixedHeader {
//!     type Header = RawHeaderFields;
//!     type Error = std::convert::Infallible;
//!
//!     fn decode(&self, _window: &[u8]) -> Result<RawHeaderFields, Self::Error> {
//!         Ok(RawHeaderFields {
//!             file_version: Version::new(1, 0, 3),
//!             header_record_size_lo: 400,
//!         })
//!     }
//! }
//!
//! struct CountBytes;
//!
//! impl RecordParser for CountBytes {
//!     type Record = u8;
//!     type Stats = usize;
//!     type Error = std::convert::Infallible;
//!
//!     fn parse(
//!         &self,
//!         buffer: &[u8],
//!         layout: &HeaderInfo,
//!     ) -> Result<ParsedRecords<u8, usize>, Self::Error> {
//!         let records = buffer[layout.records_range()].to_vec();
//!         let stats = records.len();
//!         Ok(ParsedRecords { records, stats })
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let aggregator = FileInfoAggregator::new(
//!     HeaderAnalyzer::new(FixedHeader),
//!     CountBytes,
//!     RawDetailsDecoder,
//! );
//!
//! let buffer = vec![0u8; 1000];
//! let info = aggregator.file_info(&buffer)?;
//! assert_eq!(info.header_info.header_size, 12);
//! assert_eq!(info.header_info.records_size, 388);
//! assert_eq!(info.header_info.details_size, 600);
//! assert_eq!(info.records_info, 388);
//!
//! assert_eq!(aggregator.details(&buffer)?.len(), 600);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Every operation returns [`Result`] with a [`LayoutError`] naming the stage
//! that failed. Region sizes are never clamped: a header whose records area
//! does not fit the buffer is reported as
//! [`LayoutError::LayoutInconsistency`].

#![warn(missing_docs)]

pub mod aggregator;
/// Layout resolution configuration and format constants
pub mod config;
pub mod decoder;
pub mod details;
pub mod error;
pub mod header;
pub mod records;
/// Version triple and era classification
pub mod version;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

// Re-export main types
pub use aggregator::{FileInfo, FileInfoAggregator};
pub use config::{ERA_PATCH_THRESHOLD, LayoutConfig, NEW_HEADER_SIZE, OLD_HEADER_SIZE};
pub use decoder::{BinHeaderDecoder, HeaderDecoder, RawHeader, RawHeaderFields};
pub use details::{BinDetailsDecoder, DetailsDecoder, RawDetailsDecoder};
pub use error::{BoxError, LayoutError, Region, Result, Stage};
pub use header::{HeaderAnalyzer, HeaderInfo};
pub use records::{
    BinRecordParser, KindStats, ParsedRecord, ParsedRecords, RecordParser, RecordStats,
    TypedRecord,
};
pub use version::{HeaderEra, ParseVersionError, Version};
