//! Record-stream parsing over the records area
//!
//! A [`RecordParser`] is always handed a resolved [`HeaderInfo`] and must
//! bound its scan by `records_range()`. It never derives the layout itself.

use crate::error::BoxError;
use crate::header::HeaderInfo;
use binrw::BinRead;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::marker::PhantomData;
use tracing::debug;

/// Output of a record parser: the records and their aggregate statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecords<R, S> {
    /// Records in file order
    pub records: Vec<R>,
    /// Aggregate statistics over `records`
    pub stats: S,
}

/// Walks the records area of a file
pub trait RecordParser {
    /// Parsed record type
    type Record;
    /// Aggregate statistics type
    type Stats;
    /// Parser failure type
    type Error: Into<BoxError>;

    /// Parse the records area of `buffer` as delimited by `layout`
    fn parse(
        &self,
        buffer: &[u8],
        layout: &HeaderInfo,
    ) -> Result<ParsedRecords<Self::Record, Self::Stats>, Self::Error>;
}

impl<T: RecordParser + ?Sized> RecordParser for &T {
    type Record = T::Record;
    type Stats = T::Stats;
    type Error = T::Error;

    fn parse(
        &self,
        buffer: &[u8],
        layout: &HeaderInfo,
    ) -> Result<ParsedRecords<Self::Record, Self::Stats>, Self::Error> {
        (**self).parse(buffer, layout)
    }
}

/// Record with a type tag used to group statistics
pub trait TypedRecord {
    /// Record type tag
    type Kind: Ord + Clone;

    /// Type tag of this record
    fn kind(&self) -> Self::Kind;
}

/// Record located in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord<R> {
    /// Absolute offset of the first byte of the record
    pub offset: u64,
    /// Encoded length in bytes
    pub length: u64,
    /// Decoded record
    pub record: R,
}

/// Count and size of the records of one type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindStats {
    /// Number of records
    pub count: u64,
    /// Total encoded bytes
    pub bytes: u64,
}

/// Aggregate statistics over a record stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordStats<K: Ord> {
    /// Number of records
    pub record_count: u64,
    /// Total encoded bytes of all records
    pub total_bytes: u64,
    /// Per-type breakdown
    pub by_kind: BTreeMap<K, KindStats>,
}

impl<K: Ord> Default for RecordStats<K> {
    fn default() -> Self {
        Self {
            record_count: 0,
            total_bytes: 0,
            by_kind: BTreeMap::new(),
        }
    }
}

impl<K: Ord> RecordStats<K> {
    /// Account for one record
    pub fn record(&mut self, kind: K, length: u64) {
        self.record_count += 1;
        self.total_bytes += length;
        let entry = self.by_kind.entry(kind).or_default();
        entry.count += 1;
        entry.bytes += length;
    }

    /// Statistics for one record type
    pub fn kind(&self, kind: &K) -> KindStats {
        self.by_kind.get(kind).copied().unwrap_or_default()
    }

    /// Number of distinct record types seen
    pub fn kind_count(&self) -> usize {
        self.by_kind.len()
    }
}

/// Record parser for consecutive `binrw` records filling the records area
///
/// Records must tile the area exactly: a record running past its end, or a
/// record that consumes no bytes, is an error.
pub struct BinRecordParser<R> {
    endian: binrw::Endian,
    _record: PhantomData<fn() -> R>,
}

impl<R> BinRecordParser<R> {
    /// Create a parser reading with the given endianness
    pub const fn new(endian: binrw::Endian) -> Self {
        Self {
            endian,
            _record: PhantomData,
        }
    }

    /// Create a little-endian parser
    pub const fn little() -> Self {
        Self::new(binrw::Endian::Little)
    }

    /// Create a big-endian parser
    pub const fn big() -> Self {
        Self::new(binrw::Endian::Big)
    }
}

impl<R> std::fmt::Debug for BinRecordParser<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinRecordParser")
            .field("endian", &self.endian)
            .field("record", &std::any::type_name::<R>())
            .finish()
    }
}

impl<R> RecordParser for BinRecordParser<R>
where
    R: TypedRecord + for<'a> BinRead<Args<'a> = ()>,
{
    type Record = ParsedRecord<R>;
    type Stats = RecordStats<R::Kind>;
    type Error = binrw::Error;

    fn parse(
        &self,
        buffer: &[u8],
        layout: &HeaderInfo,
    ) -> Result<ParsedRecords<Self::Record, Self::Stats>, binrw::Error> {
        let range = layout.records_range();
        let base = range.start as u64;

        let region = buffer.get(range.clone()).ok_or_else(|| {
            binrw::Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "records area {}..{} exceeds buffer of {} bytes",
                    range.start,
                    range.end,
                    buffer.len()
                ),
            ))
        })?;

        let end = region.len() as u64;
        let mut cursor = Cursor::new(region);
        let mut records = Vec::new();
        let mut stats = RecordStats::default();

        while cursor.position() < end {
            let start = cursor.position();
            let record = R::read_options(&mut cursor, self.endian, ())?;
            let length = cursor.position() - start;

            if length == 0 {
                return Err(binrw::Error::AssertFail {
                    pos: base + start,
                    message: "record consumed no bytes".to_string(),
                });
            }

            stats.record(record.kind(), length);
            records.push(ParsedRecord {
                offset: base + start,
                length,
                record,
            });
        }

        debug!(
            "Parsed {} records ({} bytes, {} kinds) from records area at {}",
            stats.record_count,
            stats.total_bytes,
            stats.kind_count(),
            base
        );

        Ok(ParsedRecords { records, stats })
    }
}
