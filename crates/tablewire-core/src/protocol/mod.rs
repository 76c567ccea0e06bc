//! Protocol modules (entry codec + message envelope).
//!
//! - `varint`: unsigned LEB128 length prefixes.
//! - `source`: the "read exactly N bytes" seam, one blocking stream source and
//!   one in-memory cursor, so every decoder is written once.
//! - `entry`: shared header plus the seven value variants.
//! - `message`: tag + opaque body control frames.
//!
//! All parsers are panic-free: malformed input is reported as
//! `TableWireError`, never as a panic or a zero-filled value.

use std::io::{self, Write};

pub mod entry;
pub mod message;
pub mod source;
pub mod varint;

/// Byte order of fixed-width numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    pub fn f64_from_bytes(self, raw: [u8; 8]) -> f64 {
        match self {
            ByteOrder::Big => f64::from_be_bytes(raw),
            ByteOrder::Little => f64::from_le_bytes(raw),
        }
    }

    pub fn f64_to_bytes(self, value: f64) -> [u8; 8] {
        match self {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        }
    }
}

/// Byte order the peers agree on for IEEE-754 doubles.
pub const WIRE_DOUBLE_ORDER: ByteOrder = ByteOrder::Big;

/// Anything that owns an exact wire representation of itself.
pub trait WireEncode {
    /// The exact bytes a peer receives for this value.
    fn canonical_bytes(&self) -> &[u8];

    fn wire_len(&self) -> usize {
        self.canonical_bytes().len()
    }

    /// Write the canonical bytes to `out`.
    fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(self.canonical_bytes())
    }
}
