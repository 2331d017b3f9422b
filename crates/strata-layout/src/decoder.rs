//! Header field decoding
//!
//! The analyzer does not know the byte encoding of the header. It is handed a
//! [`HeaderDecoder`] that turns the leading window of the file into anything
//! implementing [`RawHeader`], which exposes the two fields layout resolution
//! depends on.

use crate::error::BoxError;
use crate::version::Version;
use binrw::BinRead;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::marker::PhantomData;

/// Header fields required for layout resolution
pub trait RawHeader {
    /// Format version written by the producer of the file
    fn file_version(&self) -> Version;

    /// Absolute offset at which the records area ends and the details area begins
    fn header_record_size_lo(&self) -> u64;
}

/// Minimal decoded header carrying only the fields layout resolution reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHeaderFields {
    /// Format version
    pub file_version: Version,
    /// End offset of the records area
    pub header_record_size_lo: u64,
}

impl RawHeader for RawHeaderFields {
    fn file_version(&self) -> Version {
        self.file_version
    }

    fn header_record_size_lo(&self) -> u64 {
        self.header_record_size_lo
    }
}

/// Decodes the fixed header from the leading bytes of a file
///
/// Implementations receive a window at least as large as the newest known
/// header (shorter only when the whole file is shorter) and decide themselves
/// how many bytes to consume.
pub trait HeaderDecoder {
    /// Decoded header type
    type Header: RawHeader;
    /// Decoder failure type
    type Error: Into<BoxError>;

    /// Decode the header from the leading window of the file
    fn decode(&self, window: &[u8]) -> Result<Self::Header, Self::Error>;
}

impl<T: HeaderDecoder + ?Sized> HeaderDecoder for &T {
    type Header = T::Header;
    type Error = T::Error;

    fn decode(&self, window: &[u8]) -> Result<Self::Header, Self::Error> {
        (**self).decode(window)
    }
}

/// Header decoder for any `binrw` type that exposes the layout fields
///
/// The endianness is passed to `read_options`; types that pin their own byte
/// order with `#[br(little)]`/`#[br(big)]` ignore it.
pub struct BinHeaderDecoder<H> {
    endian: binrw::Endian,
    _header: PhantomData<fn() -> H>,
}

impl<H> BinHeaderDecoder<H> {
    /// Create a decoder reading with the given endianness
    pub const fn new(endian: binrw::Endian) -> Self {
        Self {
            endian,
            _header: PhantomData,
        }
    }

    /// Create a little-endian decoder
    pub const fn little() -> Self {
        Self::new(binrw::Endian::Little)
    }

    /// Create a big-endian decoder
    pub const fn big() -> Self {
        Self::new(binrw::Endian::Big)
    }
}

impl<H> std::fmt::Debug for BinHeaderDecoder<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinHeaderDecoder")
            .field("endian", &self.endian)
            .field("header", &std::any::type_name::<H>())
            .finish()
    }
}

impl<H> HeaderDecoder for BinHeaderDecoder<H>
where
    H: RawHeader + for<'a> BinRead<Args<'a> = ()>,
{
    type Header = H;
    type Error = binrw::Error;

    fn decode(&self, window: &[u8]) -> Result<H, binrw::Error> {
        let mut cursor = Cursor::new(window);
        H::read_options(&mut cursor, self.endian, ())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TestHeader;
    use binrw::BinWrite;
    use std::io::Cursor;

    #[test]
    fn test_bin_decoder_reads_fields() {
        let header = TestHeader::new([2, 1, 7], 4096);
        let mut buffer = Vec::new();
        header
            .write_options(&mut Cursor::new(&mut buffer), binrw::Endian::Little, ())
            .expect("Test operation should succeed");
        assert_eq!(buffer.len(), 12);

        let decoder = BinHeaderDecoder::<TestHeader>::little();
        let decoded = decoder.decode(&buffer).expect("Test operation should succeed");

        assert_eq!(decoded, header);
        assert_eq!(decoded.file_version(), Version::new(2, 1, 7));
        assert_eq!(decoded.header_record_size_lo(), 4096);
    }

    #[test]
    fn test_bin_decoder_rejects_bad_magic() {
        let mut buffer = vec![0u8; 12];
        buffer[..4].copy_from_slice(b"XXXX");

        let decoder = BinHeaderDecoder::<TestHeader>::little();
        let error = decoder.decode(&buffer).expect_err("Bad magic should fail");
        assert!(matches!(error, binrw::Error::BadMagic { .. }));
    }

    #[test]
    fn test_bin_decoder_short_window() {
        let decoder = BinHeaderDecoder::<TestHeader>::little();
        assert!(decoder.decode(b"STRA\x01").is_err());
    }

    #[test]
    fn test_decoder_by_reference() {
        fn records_end<D: HeaderDecoder>(decoder: D, window: &[u8]) -> u64 {
            decoder
                .decode(window)
                .map_err(Into::<crate::error::BoxError>::into)
                .expect("Test operation should succeed")
                .header_record_size_lo()
        }

        let decoder = BinHeaderDecoder::<TestHeader>::big();

        let mut buffer = Vec::new();
        TestHeader::new([0, 0, 1], 12)
            .write_options(&mut Cursor::new(&mut buffer), binrw::Endian::Little, ())
            .expect("Test operation should succeed");

        // TestHeader pins little-endian, so the decoder endianness is irrelevant
        assert_eq!(records_end(&decoder, &buffer), 12);
        assert_eq!(records_end(decoder, &buffer), 12);
    }
}
