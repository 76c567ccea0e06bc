//! Shared entry preamble: name, type tag, identifier, sequence, flag.
//!
//! Wire order is fixed:
//! `varint(name_len) name tag:1 id:2 seq:2 flag:1`.

use bytes::BufMut;

use crate::error::{Result, TableWireError};
use crate::protocol::source::ByteSource;
use crate::protocol::varint::{peek_uleb128, put_len_prefix, uleb128_len};

/// Tag reserved for RPC definitions. Not decodable by this codec.
pub const RPC_DEFINITION_TAG: u8 = 0x20;

/// Raw identifier a local producer sends before the remote authority has
/// assigned a real one.
const UNASSIGNED_ID: u16 = 0xFFFF;

const FLAG_TEMPORARY: u8 = 0x00;
const FLAG_PERSIST: u8 = 0x01;
const FLAG_RESERVED: u8 = 0xFE;

/// Closed set of entry value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntryType {
    Boolean = 0x00,
    Double = 0x01,
    String = 0x02,
    Raw = 0x03,
    BooleanArray = 0x10,
    DoubleArray = 0x11,
    StringArray = 0x12,
}

impl EntryType {
    /// Dispatch on a wire tag. Anything outside the seven kinds, including
    /// [`RPC_DEFINITION_TAG`], is `UnknownType`.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0x00 => Ok(EntryType::Boolean),
            0x01 => Ok(EntryType::Double),
            0x02 => Ok(EntryType::String),
            0x03 => Ok(EntryType::Raw),
            0x10 => Ok(EntryType::BooleanArray),
            0x11 => Ok(EntryType::DoubleArray),
            0x12 => Ok(EntryType::StringArray),
            other => Err(TableWireError::UnknownType(other)),
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Boolean => "boolean",
            EntryType::Double => "double",
            EntryType::String => "string",
            EntryType::Raw => "raw",
            EntryType::BooleanArray => "boolean[]",
            EntryType::DoubleArray => "double[]",
            EntryType::StringArray => "string[]",
        }
    }
}

/// Entry identifier as handed out by the remote authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryId {
    /// Freshly created locally, pending assignment.
    #[default]
    Unassigned,
    Assigned(u16),
}

impl EntryId {
    pub fn from_raw(raw: u16) -> Self {
        if raw == UNASSIGNED_ID {
            EntryId::Unassigned
        } else {
            EntryId::Assigned(raw)
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            EntryId::Unassigned => UNASSIGNED_ID,
            EntryId::Assigned(id) => id,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, EntryId::Unassigned)
    }
}

/// 16-bit revision counter with wraparound.
///
/// Ordering follows serial-number arithmetic: `a` supersedes `b` when
/// `a - b (mod 2^16)` lies in `1..=32767`. `0x0000` therefore supersedes
/// `0xFFFF`, and a distance of exactly `0x8000` supersedes in neither
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SequenceNumber(u16);

impl SequenceNumber {
    pub fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Following revision, wrapping at `u16::MAX`.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn is_newer_than(self, other: SequenceNumber) -> bool {
        let distance = self.0.wrapping_sub(other.0);
        (1..0x8000).contains(&distance)
    }
}

/// Persistence flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Persistence {
    #[default]
    Temporary,
    Persist,
    Reserved,
    /// Out-of-contract byte, kept as received.
    Unknown(u8),
}

impl Persistence {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            FLAG_TEMPORARY => Persistence::Temporary,
            FLAG_PERSIST => Persistence::Persist,
            FLAG_RESERVED => Persistence::Reserved,
            other => Persistence::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Persistence::Temporary => FLAG_TEMPORARY,
            Persistence::Persist => FLAG_PERSIST,
            Persistence::Reserved => FLAG_RESERVED,
            Persistence::Unknown(b) => b,
        }
    }

    pub fn is_persistent(self) -> bool {
        self == Persistence::Persist
    }
}

/// Header fields shared by every entry kind. The type tag travels with the
/// value, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    pub name: String,
    pub id: EntryId,
    pub sequence: SequenceNumber,
    pub persistence: Persistence,
}

impl EntryHeader {
    /// Header for a locally created entry: unassigned id, sequence 0,
    /// temporary.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: EntryId::Unassigned,
            sequence: SequenceNumber::default(),
            persistence: Persistence::Temporary,
        }
    }

    /// Capacity hint; `put` rejects names too long to prefix.
    pub(crate) fn encoded_len(&self) -> usize {
        let name_len = u32::try_from(self.name.len()).unwrap_or(u32::MAX);
        uleb128_len(name_len) + self.name.len() + 6
    }

    pub(crate) fn put<B: BufMut>(&self, tag: EntryType, buf: &mut B) -> Result<()> {
        put_len_prefix(buf, self.name.len())?;
        buf.put_slice(self.name.as_bytes());
        buf.put_u8(tag.tag());
        buf.put_u16(self.id.to_raw());
        buf.put_u16(self.sequence.get());
        buf.put_u8(self.persistence.to_byte());
        Ok(())
    }

    /// Read the preamble, appending every consumed byte to `raw`.
    pub(crate) fn read<S: ByteSource>(src: &mut S, raw: &mut Vec<u8>) -> Result<(Self, EntryType)> {
        let (name_len, prefix) = peek_uleb128(src)?;
        raw.extend_from_slice(&prefix);

        let name_bytes = src.read_vec(name_len as usize)?;
        raw.extend_from_slice(&name_bytes);
        let name = String::from_utf8(name_bytes)
            .map_err(|e| TableWireError::InvalidEncoding(format!("entry name: {e}")))?;

        let tag = src.read_u8()?;
        raw.push(tag);
        let entry_type = EntryType::from_tag(tag)?;

        let id = src.read_array::<2>()?;
        let seq = src.read_array::<2>()?;
        let flag = src.read_u8()?;
        raw.extend_from_slice(&id);
        raw.extend_from_slice(&seq);
        raw.push(flag);

        let header = Self {
            name,
            id: EntryId::from_raw(u16::from_be_bytes(id)),
            sequence: SequenceNumber::new(u16::from_be_bytes(seq)),
            persistence: Persistence::from_byte(flag),
        };
        Ok((header, entry_type))
    }
}
