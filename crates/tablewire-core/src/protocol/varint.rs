//! Unsigned LEB128 varints.
//!
//! 7 data bits per byte, low chunk first, high bit set on every byte but the
//! last. Protocol values are bounded to 32 bits, so an encoding never exceeds
//! [`MAX_ULEB128_LEN`] bytes.

use bytes::BufMut;

use crate::error::{Result, TableWireError};
use crate::protocol::source::ByteSource;

/// Longest valid encoding of a `u32`.
pub const MAX_ULEB128_LEN: usize = 5;

const CONTINUATION: u8 = 0x80;
const DATA_MASK: u8 = 0x7f;

/// Number of bytes `value` takes on the wire.
pub fn uleb128_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

pub fn put_uleb128<B: BufMut>(buf: &mut B, mut value: u32) {
    loop {
        let chunk = (value as u8) & DATA_MASK;
        value >>= 7;
        if value == 0 {
            buf.put_u8(chunk);
            return;
        }
        buf.put_u8(chunk | CONTINUATION);
    }
}

pub fn encode_uleb128(value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(uleb128_len(value));
    put_uleb128(&mut out, value);
    out
}

/// Length prefix for a payload of `len` bytes or elements.
pub(crate) fn put_len_prefix<B: BufMut>(buf: &mut B, len: usize) -> Result<()> {
    let len32 = u32::try_from(len).map_err(|_| TableWireError::PayloadTooLarge(len))?;
    put_uleb128(buf, len32);
    Ok(())
}

/// Consuming read: advances `src` past the varint.
pub fn read_uleb128<S: ByteSource>(src: &mut S) -> Result<u32> {
    decode(src, |_| {})
}

/// Read a varint and hand back its exact raw bytes as well, so callers can
/// splice an untouched length prefix into a canonical buffer. Non-minimal
/// encodings are returned as received.
pub fn peek_uleb128<S: ByteSource>(src: &mut S) -> Result<(u32, Vec<u8>)> {
    let mut raw = Vec::with_capacity(MAX_ULEB128_LEN);
    let value = decode(src, |b| raw.push(b))?;
    Ok((value, raw))
}

fn decode<S: ByteSource>(src: &mut S, mut keep: impl FnMut(u8)) -> Result<u32> {
    let mut value = 0u32;
    for index in 0..MAX_ULEB128_LEN {
        let byte = match src.read_u8() {
            Ok(b) => b,
            Err(TableWireError::Truncated { .. }) => {
                tracing::debug!(read = index, "varint ended without terminator");
                return Err(TableWireError::MalformedVarint);
            }
            Err(e) => return Err(e),
        };
        keep(byte);

        let chunk = u32::from(byte & DATA_MASK);
        // fifth byte may only carry the top 4 bits of a u32
        if index == MAX_ULEB128_LEN - 1 && chunk > 0x0f {
            tracing::debug!(byte, "varint overflows 32 bits");
            return Err(TableWireError::MalformedVarint);
        }
        value |= chunk << (7 * index);

        if byte & CONTINUATION == 0 {
            return Ok(value);
        }
    }
    tracing::debug!("varint longer than {MAX_ULEB128_LEN} bytes");
    Err(TableWireError::MalformedVarint)
}
