//! Test fixtures shared across module tests
//!
//! Provides a small binrw header/record encoding for building synthetic files,
//! plus collaborator doubles that count calls and capture their input.

use crate::decoder::{HeaderDecoder, RawHeader, RawHeaderFields};
use crate::details::DetailsDecoder;
use crate::records::TypedRecord;
use crate::version::Version;
use binrw::{BinRead, BinWrite};
use std::io::Cursor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 12-byte test header: magic(4) + version(3) + flags(1) + records_end(4)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little, magic = b"STRA")]
pub struct TestHeader {
    pub version: [u8; 3],
    pub flags: u8,
    pub records_end: u32,
}

impl TestHeader {
    pub fn new(version: [u8; 3], records_end: u32) -> Self {
        Self {
            version,
            flags: 0,
            records_end,
        }
    }
}

impl RawHeader for TestHeader {
    fn file_version(&self) -> Version {
        Version::from(self.version)
    }

    fn header_record_size_lo(&self) -> u64 {
        u64::from(self.records_end)
    }
}

/// Length-prefixed test record: kind(1) + len(2) + payload(len)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct TestRecord {
    pub kind: u8,
    pub len: u16,
    #[br(count = len)]
    pub payload: Vec<u8>,
}

impl TestRecord {
    pub fn new(kind: u8, payload: &[u8]) -> Self {
        Self {
            kind,
            len: payload.len() as u16,
            payload: payload.to_vec(),
        }
    }

    pub fn encoded_len(&self) -> u64 {
        3 + self.payload.len() as u64
    }
}

impl TypedRecord for TestRecord {
    type Kind = u8;

    fn kind(&self) -> u8 {
        self.kind
    }
}

/// Build a complete file: header padded to its era size, records, details
pub fn build_file(version: [u8; 3], records: &[TestRecord], details: &[u8]) -> Vec<u8> {
    let header_size: usize = if version[2] < 6 { 12 } else { 100 };

    let mut body = Vec::new();
    {
        let mut cursor = Cursor::new(&mut body);
        for record in records {
            record
                .write_options(&mut cursor, binrw::Endian::Little, ())
                .expect("Test record should encode");
        }
    }

    let records_end = (header_size + body.len()) as u32;

    let mut data = Vec::new();
    TestHeader::new(version, records_end)
        .write_options(&mut Cursor::new(&mut data), binrw::Endian::Little, ())
        .expect("Test header should encode");
    data.resize(header_size, 0);
    data.extend_from_slice(&body);
    data.extend_from_slice(details);
    data
}

/// Header decoder returning preset fields and counting invocations
#[derive(Debug, Default)]
pub struct FixedHeaderDecoder {
    pub fields: Option<RawHeaderFields>,
    pub calls: AtomicUsize,
    pub window_len: AtomicUsize,
}

impl FixedHeaderDecoder {
    pub fn new(version: Version, header_record_size_lo: u64) -> Self {
        Self {
            fields: Some(RawHeaderFields {
                file_version: version,
                header_record_size_lo,
            }),
            ..Self::default()
        }
    }

    /// Decoder that rejects every header
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HeaderDecoder for FixedHeaderDecoder {
    type Header = RawHeaderFields;
    type Error = std::io::Error;

    fn decode(&self, window: &[u8]) -> Result<RawHeaderFields, std::io::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.window_len.store(window.len(), Ordering::SeqCst);
        self.fields
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidData, "bad magic"))
    }
}

/// Details decoder that records the bytes it was handed
#[derive(Debug, Default)]
pub struct CapturingDetailsDecoder {
    pub seen: Mutex<Vec<u8>>,
}

impl CapturingDetailsDecoder {
    pub fn seen(&self) -> Vec<u8> {
        self.seen.lock().expect("Lock should not be poisoned").clone()
    }
}

impl DetailsDecoder for CapturingDetailsDecoder {
    type Details = usize;
    type Error = std::convert::Infallible;

    fn decode(&self, bytes: &[u8]) -> Result<usize, Self::Error> {
        let mut seen = self.seen.lock().expect("Lock should not be poisoned");
        seen.clear();
        seen.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}
