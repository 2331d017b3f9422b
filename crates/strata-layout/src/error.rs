//! Error types for layout resolution and region decoding
//!
//! Every failure names the stage that produced it so callers can tell a bad
//! header apart from a header whose declared regions do not fit the file, or
//! from a region whose contents could not be decoded.

use thiserror::Error;

/// Boxed error returned by injected collaborators
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// File region handed to a collaborator after layout resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Records area between the header and the details area
    Records,
    /// Trailing details area
    Details,
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Records => write!(f, "records"),
            Self::Details => write!(f, "details"),
        }
    }
}

/// Processing stage at which an analysis failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Analyzer configuration was rejected
    Configuration,
    /// Leading header bytes could not be decoded
    HeaderDecode,
    /// Header-declared regions do not fit the buffer
    LayoutValidation,
    /// Record-stream parser failed on the records area
    RecordParsing,
    /// Details decoder failed on the trailing area
    DetailsDecoding,
}

/// Errors that can occur while resolving a file layout or decoding its regions
#[derive(Error, Debug)]
pub enum LayoutError {
    /// Buffer is shorter than the smallest known header
    #[error("Truncated input: need at least {needed} bytes, got {available}")]
    TruncatedInput {
        /// Minimum number of bytes required
        needed: u64,
        /// Bytes actually available
        available: u64,
    },

    /// Header field decoder rejected the leading bytes
    #[error("Header decode failed: {source}")]
    HeaderDecode {
        /// Decoder error
        #[source]
        source: BoxError,
    },

    /// Header declares regions that do not fit the actual file
    #[error(
        "Layout inconsistency: records end at {records_end} but header is {header_size} bytes and file is {file_size} bytes"
    )]
    LayoutInconsistency {
        /// Header size selected by the file's era
        header_size: u64,
        /// Absolute end offset of the records area declared by the header
        records_end: u64,
        /// Total buffer length
        file_size: u64,
    },

    /// Record parser or details decoder failed on its region
    #[error("Failed to decode {region} area: {source}")]
    RegionDecode {
        /// Region being decoded
        region: Region,
        /// Collaborator error
        #[source]
        source: BoxError,
    },

    /// Layout configuration is invalid
    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),
}

/// Type alias for layout operation results
pub type Result<T> = std::result::Result<T, LayoutError>;

impl LayoutError {
    /// Wrap a header decoder error
    pub fn header_decode<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::HeaderDecode {
            source: error.into(),
        }
    }

    /// Wrap a record parser or details decoder error
    pub fn region_decode<E>(region: Region, error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::RegionDecode {
            region,
            source: error.into(),
        }
    }

    /// Stage that produced this error
    pub const fn stage(&self) -> Stage {
        match self {
            Self::InvalidConfig(_) => Stage::Configuration,
            Self::TruncatedInput { .. } | Self::HeaderDecode { .. } => Stage::HeaderDecode,
            Self::LayoutInconsistency { .. } => Stage::LayoutValidation,
            Self::RegionDecode {
                region: Region::Records,
                ..
            } => Stage::RecordParsing,
            Self::RegionDecode {
                region: Region::Details,
                ..
            } => Stage::DetailsDecoding,
        }
    }

    /// Check if the error comes from the input bytes rather than from configuration
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::InvalidConfig(_))
    }
}
