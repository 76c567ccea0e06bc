//! Table entries: one shared header plus a typed value.
//!
//! An `Entry` is immutable. Decoded entries keep the exact bytes they were
//! decoded from, so re-sending one reproduces the peer's input byte for byte
//! even when that input was not minimally encoded. Updates build a new entry.

use std::io::Read;

use crate::error::{Result, TableWireError};
use crate::protocol::source::{BufSource, ByteSource, ReadSource};
use crate::protocol::WireEncode;

mod body;
pub mod header;
pub mod value;

pub use body::MAX_ARRAY_LEN;
pub use header::{
    EntryHeader, EntryId, EntryType, Persistence, SequenceNumber, RPC_DEFINITION_TAG,
};
pub use value::EntryValue;

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    header: EntryHeader,
    value: EntryValue,
    /// Full wire form: header bytes then body bytes.
    canonical: Vec<u8>,
    body_offset: usize,
}

impl Entry {
    /// New local entry: unassigned id, sequence 0, temporary.
    pub fn new(name: impl Into<String>, value: impl Into<EntryValue>) -> Result<Self> {
        Self::from_parts(EntryHeader::new(name), value.into())
    }

    /// Encode `header` + `value`. Fails on arrays over 255 elements or
    /// lengths beyond 32 bits.
    pub fn from_parts(header: EntryHeader, value: EntryValue) -> Result<Self> {
        let mut canonical = Vec::with_capacity(header.encoded_len() + 16);
        header.put(value.entry_type(), &mut canonical)?;
        let body_offset = canonical.len();
        body::put_body(&value, &mut canonical)?;
        Ok(Self {
            header,
            value,
            canonical,
            body_offset,
        })
    }

    /// Decode one entry from a blocking stream. Reads exactly the entry's
    /// bytes and no more, so it can be called repeatedly on the same reader.
    pub fn decode_from_stream<R: Read>(reader: R) -> Result<Self> {
        Self::read_from(&mut ReadSource::new(reader))
    }

    /// Decode one entry that fills `data` exactly.
    pub fn decode_from_buffer(data: &[u8]) -> Result<Self> {
        let mut src = BufSource::new(data);
        let entry = Self::read_from(&mut src)?;
        match src.remaining() {
            0 => Ok(entry),
            extra => Err(TableWireError::TrailingBytes(extra)),
        }
    }

    /// Decode one entry from any byte source.
    pub fn read_from<S: ByteSource>(src: &mut S) -> Result<Self> {
        let res = Self::read_inner(src);
        match &res {
            Ok(entry) => tracing::trace!(
                name = %entry.header.name,
                entry_type = entry.entry_type().as_str(),
                len = entry.canonical.len(),
                "entry decoded"
            ),
            Err(e) => tracing::debug!(code = e.code().as_str(), error = %e, "entry rejected"),
        }
        res
    }

    fn read_inner<S: ByteSource>(src: &mut S) -> Result<Self> {
        let mut canonical = Vec::new();
        let (header, entry_type) = EntryHeader::read(src, &mut canonical)?;
        let body_offset = canonical.len();
        let value = body::read_body(entry_type, src, &mut canonical)?;
        Ok(Self {
            header,
            value,
            canonical,
            body_offset,
        })
    }

    /// Build an entry from an already-split header and a pre-extracted body
    /// slice. The slice must hold exactly one `entry_type` payload; it is
    /// kept verbatim.
    pub fn from_items(header: EntryHeader, entry_type: EntryType, body: &[u8]) -> Result<Self> {
        let mut src = BufSource::new(body);
        let mut raw_body = Vec::with_capacity(body.len());
        let value = body::read_body(entry_type, &mut src, &mut raw_body)?;
        if src.remaining() != 0 {
            return Err(TableWireError::TrailingBytes(src.remaining()));
        }
        Self::with_raw_body(header, value, &raw_body)
    }

    fn with_raw_body(header: EntryHeader, value: EntryValue, raw_body: &[u8]) -> Result<Self> {
        let mut canonical = Vec::with_capacity(header.encoded_len() + raw_body.len());
        header.put(value.entry_type(), &mut canonical)?;
        let body_offset = canonical.len();
        canonical.extend_from_slice(raw_body);
        Ok(Self {
            header,
            value,
            canonical,
            body_offset,
        })
    }

    /// Same value under a new header; the body bytes are carried over as-is.
    fn rehead(&self, header: EntryHeader) -> Result<Self> {
        Self::with_raw_body(header, self.value.clone(), self.body_bytes())
    }

    pub fn with_persistence(&self, persistence: Persistence) -> Result<Self> {
        self.rehead(EntryHeader {
            persistence,
            ..self.header.clone()
        })
    }

    /// Copy carrying the identifier the remote authority assigned.
    pub fn with_id(&self, id: EntryId) -> Result<Self> {
        self.rehead(EntryHeader {
            id,
            ..self.header.clone()
        })
    }

    pub fn with_sequence(&self, sequence: SequenceNumber) -> Result<Self> {
        self.rehead(EntryHeader {
            sequence,
            ..self.header.clone()
        })
    }

    /// Next revision: new value, sequence advanced by one (wrapping).
    pub fn with_value(&self, value: impl Into<EntryValue>) -> Result<Self> {
        let header = EntryHeader {
            sequence: self.header.sequence.next(),
            ..self.header.clone()
        };
        Self::from_parts(header, value.into())
    }

    /// Whether this entry should replace `other` in a table.
    pub fn supersedes(&self, other: &Entry) -> bool {
        self.header.id == other.header.id && self.header.sequence.is_newer_than(other.header.sequence)
    }

    pub fn header(&self) -> &EntryHeader {
        &self.header
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn id(&self) -> EntryId {
        self.header.id
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.header.sequence
    }

    pub fn persistence(&self) -> Persistence {
        self.header.persistence
    }

    pub fn is_persistent(&self) -> bool {
        self.header.persistence.is_persistent()
    }

    pub fn entry_type(&self) -> EntryType {
        self.value.entry_type()
    }

    pub fn value(&self) -> &EntryValue {
        &self.value
    }

    /// Payload bytes only (everything after the flag byte).
    pub fn body_bytes(&self) -> &[u8] {
        self.canonical.get(self.body_offset..).unwrap_or_default()
    }

    pub fn into_canonical_bytes(self) -> Vec<u8> {
        self.canonical
    }
}

impl WireEncode for Entry {
    fn canonical_bytes(&self) -> &[u8] {
        &self.canonical
    }
}
