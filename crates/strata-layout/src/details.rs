//! Details area decoding
//!
//! The details schema is owned by the caller. A [`DetailsDecoder`] names the
//! concrete type it produces, so callers get a typed value back instead of an
//! untyped blob.

use crate::error::BoxError;
use binrw::BinRead;
use std::io::Cursor;
use std::marker::PhantomData;

/// Decodes the trailing details area of a file
pub trait DetailsDecoder {
    /// Decoded details value
    type Details;
    /// Decoder failure type
    type Error: Into<BoxError>;

    /// Decode exactly the bytes of the details area
    fn decode(&self, bytes: &[u8]) -> Result<Self::Details, Self::Error>;
}

impl<T: DetailsDecoder + ?Sized> DetailsDecoder for &T {
    type Details = T::Details;
    type Error = T::Error;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Details, Self::Error> {
        (**self).decode(bytes)
    }
}

/// Returns the details area as owned bytes without interpreting it
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDetailsDecoder;

impl DetailsDecoder for RawDetailsDecoder {
    type Details = Vec<u8>;
    type Error = std::convert::Infallible;

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, Self::Error> {
        Ok(bytes.to_vec())
    }
}

/// Details decoder for any `binrw` type
pub struct BinDetailsDecoder<D> {
    endian: binrw::Endian,
    _details: PhantomData<fn() -> D>,
}

impl<D> BinDetailsDecoder<D> {
    /// Create a decoder reading with the given endianness
    pub const fn new(endian: binrw::Endian) -> Self {
        Self {
            endian,
            _details: PhantomData,
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

impl<D> std::fmt::Debug for BinDetailsDecoder<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinDetailsDecoder")
            .field("endian", &self.endian)
            .field("details", &std::any::type_name::<D>())
            .finish()
    }
}

impl<D> DetailsDecoder for BinDetailsDecoder<D>
where
    D: for<'a> BinRead<Args<'a> = ()>,
{
    type Details = D;
    type Error = binrw::Error;

    fn decode(&self, bytes: &[u8]) -> Result<D, binrw::Error> {
        let mut cursor = Cursor::new(bytes);
        D::read_options(&mut cursor, self.endian, ())
    }
}
