//! Composite file analysis
//!
//! [`FileInfoAggregator`] resolves the layout first and then hands the bounded
//! regions to the injected record parser and details decoder. Each operation
//! resolves the layout at most once.

use crate::decoder::HeaderDecoder;
use crate::details::DetailsDecoder;
use crate::error::{LayoutError, Region, Result};
use crate::header::{HeaderAnalyzer, HeaderInfo};
use crate::records::{ParsedRecords, RecordParser};
use serde::Serialize;
use tracing::debug;

/// Layout and record statistics of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo<S> {
    /// Resolved region layout
    pub header_info: HeaderInfo,
    /// Statistics produced by the record parser
    pub records_info: S,
}

/// Combines layout resolution with record parsing and details decoding
#[derive(Debug)]
pub struct FileInfoAggregator<H, P, D> {
    analyzer: HeaderAnalyzer<H>,
    records: P,
    details: D,
}

impl<H, P, D> FileInfoAggregator<H, P, D>
where
    H: HeaderDecoder,
    P: RecordParser,
    D: DetailsDecoder,
{
    /// Create an aggregator from its collaborators
    pub fn new(analyzer: HeaderAnalyzer<H>, records: P, details: D) -> Self {
        Self {
            analyzer,
            records,
            details,
        }
    }

    /// Header analyzer in use
    pub const fn analyzer(&self) -> &HeaderAnalyzer<H> {
        &self.analyzer
    }

    /// Resolve the region layout of `buffer`
    pub fn header_info(&self, buffer: &[u8]) -> Result<HeaderInfo> {
        self.analyzer.resolve_layout(buffer)
    }

    /// Parse the records area of `buffer`
    ///
    /// With `None` the layout is resolved here first. Callers that already
    /// hold the layout of this buffer should pass it to avoid decoding the
    /// header a second time. A supplied layout is validated against
    /// `buffer` and rejected with [`LayoutError::LayoutInconsistency`] when its
    /// regions do not tile it.
    pub fn parse_records(
        &self,
        buffer: &[u8],
        layout: Option<&HeaderInfo>,
    ) -> Result<ParsedRecords<P::Record, P::Stats>> {
        let resolved;
        let layout = match layout {
            Some(layout) => {
                layout.validate(buffer.len())?;
                layout
            }
            None => {
                resolved = self.header_info(buffer)?;
                &resolved
            }
        };

        debug!(
            "Parsing records area {:?} of {} byte file",
            layout.records_range(),
            layout.file_size
        );

        self.records
            .parse(buffer, layout)
            .map_err(|e| LayoutError::region_decode(Region::Records, e))
    }

    /// Record statistics of `buffer`
    ///
    /// Resolves the layout internally. Use [`Self::file_info`] when the layout
    /// is needed as well.
    pub fn records_info(&self, buffer: &[u8]) -> Result<P::Stats> {
        Ok(self.parse_records(buffer, None)?.stats)
    }

    /// Layout and record statistics of `buffer`, resolving the layout once
    pub fn file_info(&self, buffer: &[u8]) -> Result<FileInfo<P::Stats>> {
        let header_info = self.header_info(buffer)?;
        let parsed = self.parse_records(buffer, Some(&header_info))?;

        Ok(FileInfo {
            header_info,
            records_info: parsed.stats,
        })
    }

    /// Decode the details area of `buffer`
    pub fn details(&self, buffer: &[u8]) -> Result<D::Details> {
        let header_info = self.header_info(buffer)?;
        let start = header_info.details_offset() as usize;

        debug!(
            "Decoding {} byte details area at offset {}",
            header_info.details_size, start
        );

        self.details
            .decode(&buffer[start..])
            .map_err(|e| LayoutError::region_decode(Region::Details, e))
    }
}
