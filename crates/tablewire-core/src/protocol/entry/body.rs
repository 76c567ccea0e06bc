//! Variant body codecs.
//!
//! Layouts:
//! - Boolean: `value:1` (only `0x01` is true)
//! - Double: `value:8` in [`WIRE_DOUBLE_ORDER`]
//! - String / Raw: `varint(len) bytes`
//! - arrays: `count:1` followed by `count` elements of the scalar layout
//!
//! Readers append every byte they consume to a caller-provided buffer, so the
//! entry keeps its input verbatim rather than a re-encoding of the value.

use bytes::BufMut;

use crate::error::{Result, TableWireError};
use crate::protocol::entry::header::EntryType;
use crate::protocol::entry::value::EntryValue;
use crate::protocol::source::ByteSource;
use crate::protocol::varint::{peek_uleb128, put_len_prefix};
use crate::protocol::WIRE_DOUBLE_ORDER;

/// Largest element count a 1-byte array header can carry.
pub const MAX_ARRAY_LEN: usize = u8::MAX as usize;

const BOOL_TRUE: u8 = 0x01;
const BOOL_FALSE: u8 = 0x00;

fn bool_from_wire(byte: u8) -> bool {
    byte == BOOL_TRUE
}

fn bool_to_wire(value: bool) -> u8 {
    if value {
        BOOL_TRUE
    } else {
        BOOL_FALSE
    }
}

pub(crate) fn read_body<S: ByteSource>(
    entry_type: EntryType,
    src: &mut S,
    raw: &mut Vec<u8>,
) -> Result<EntryValue> {
    let value = match entry_type {
        EntryType::Boolean => {
            let byte = src.read_u8()?;
            raw.push(byte);
            EntryValue::Boolean(bool_from_wire(byte))
        }
        EntryType::Double => EntryValue::Double(read_double(src, raw)?),
        EntryType::String => EntryValue::String(utf8(read_prefixed(src, raw)?)?),
        EntryType::Raw => EntryValue::Raw(read_prefixed(src, raw)?),
        EntryType::BooleanArray => {
            let count = read_count(src, raw)?;
            let bytes = src.read_vec(count)?;
            raw.extend_from_slice(&bytes);
            EntryValue::BooleanArray(bytes.into_iter().map(bool_from_wire).collect())
        }
        EntryType::DoubleArray => {
            let count = read_count(src, raw)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(read_double(src, raw)?);
            }
            EntryValue::DoubleArray(values)
        }
        EntryType::StringArray => {
            let count = read_count(src, raw)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(utf8(read_prefixed(src, raw)?)?);
            }
            EntryValue::StringArray(values)
        }
    };
    Ok(value)
}

pub(crate) fn put_body<B: BufMut>(value: &EntryValue, buf: &mut B) -> Result<()> {
    match value {
        EntryValue::Boolean(v) => buf.put_u8(bool_to_wire(*v)),
        EntryValue::Double(v) => buf.put_slice(&WIRE_DOUBLE_ORDER.f64_to_bytes(*v)),
        EntryValue::String(v) => {
            put_len_prefix(buf, v.len())?;
            buf.put_slice(v.as_bytes());
        }
        EntryValue::Raw(v) => {
            put_len_prefix(buf, v.len())?;
            buf.put_slice(v);
        }
        EntryValue::BooleanArray(v) => {
            put_count(buf, v.len())?;
            for b in v {
                buf.put_u8(bool_to_wire(*b));
            }
        }
        EntryValue::DoubleArray(v) => {
            put_count(buf, v.len())?;
            for d in v {
                buf.put_slice(&WIRE_DOUBLE_ORDER.f64_to_bytes(*d));
            }
        }
        EntryValue::StringArray(v) => {
            put_count(buf, v.len())?;
            for s in v {
                put_len_prefix(buf, s.len())?;
                buf.put_slice(s.as_bytes());
            }
        }
    }
    Ok(())
}

fn read_double<S: ByteSource>(src: &mut S, raw: &mut Vec<u8>) -> Result<f64> {
    let bytes = src.read_array::<8>()?;
    raw.extend_from_slice(&bytes);
    Ok(WIRE_DOUBLE_ORDER.f64_from_bytes(bytes))
}

fn read_count<S: ByteSource>(src: &mut S, raw: &mut Vec<u8>) -> Result<usize> {
    let count = src.read_u8()?;
    raw.push(count);
    Ok(usize::from(count))
}

// Length prefix is a byte count of the data that follows it.
fn read_prefixed<S: ByteSource>(src: &mut S, raw: &mut Vec<u8>) -> Result<Vec<u8>> {
    let (len, prefix) = peek_uleb128(src)?;
    raw.extend_from_slice(&prefix);
    let data = src.read_vec(len as usize)?;
    raw.extend_from_slice(&data);
    Ok(data)
}

fn put_count<B: BufMut>(buf: &mut B, len: usize) -> Result<()> {
    let count = u8::try_from(len).map_err(|_| TableWireError::TooManyElements(len))?;
    buf.put_u8(count);
    Ok(())
}

fn utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        tracing::debug!(error = %e, "string payload is not utf-8");
        TableWireError::InvalidEncoding(e.to_string())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::protocol::source::BufSource;

    fn decode(entry_type: EntryType, wire: &[u8]) -> Result<(EntryValue, Vec<u8>)> {
        let mut src = BufSource::new(wire);
        let mut raw = Vec::new();
        let value = read_body(entry_type, &mut src, &mut raw)?;
        Ok((value, raw))
    }

    fn encode(value: &EntryValue) -> Vec<u8> {
        let mut out = Vec::new();
        put_body(value, &mut out).unwrap();
        out
    }

    #[test]
    fn boolean_is_permissive() {
        assert_eq!(decode(EntryType::Boolean, &[0x01]).unwrap().0, EntryValue::Boolean(true));
        assert_eq!(decode(EntryType::Boolean, &[0x00]).unwrap().0, EntryValue::Boolean(false));
        let (value, raw) = decode(EntryType::Boolean, &[0x02]).unwrap();
        assert_eq!(value, EntryValue::Boolean(false));
        assert_eq!(raw, vec![0x02]);
    }

    #[test]
    fn double_layout() {
        let wire = encode(&EntryValue::Double(1.0));
        assert_eq!(wire, vec![0x3f, 0xf0, 0, 0, 0, 0, 0, 0]);
        let err = decode(EntryType::Double, &wire[..7]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Truncated);
    }

    #[test]
    fn string_prefix_counts_bytes() {
        let value = EntryValue::from("héllo");
        let wire = encode(&value);
        assert_eq!(wire[0], 6);
        assert_eq!(wire.len(), 7);
        let (back, raw) = decode(EntryType::String, &wire).unwrap();
        assert_eq!(back, value);
        assert_eq!(raw, wire);
    }

    #[test]
    fn string_rejects_invalid_utf8_but_raw_accepts() {
        let wire = [0x02, 0xff, 0xfe];
        assert_eq!(
            decode(EntryType::String, &wire).unwrap_err().code(),
            ErrorCode::InvalidEncoding
        );
        let (raw_value, _) = decode(EntryType::Raw, &wire).unwrap();
        assert_eq!(raw_value, EntryValue::Raw(vec![0xff, 0xfe]));
    }

    #[test]
    fn raw_with_multibyte_prefix() {
        let blob: Vec<u8> = (0..200u8).collect();
        let wire = encode(&EntryValue::Raw(blob.clone()));
        assert_eq!(&wire[..2], &[0xc8, 0x01]);
        assert_eq!(decode(EntryType::Raw, &wire).unwrap().0, EntryValue::Raw(blob));
    }

    #[test]
    fn arrays_keep_order() {
        let value = EntryValue::from(vec![3.0, -1.0, 2.0]);
        let wire = encode(&value);
        assert_eq!(wire[0], 3);
        assert_eq!(wire.len(), 1 + 3 * 8);
        assert_eq!(decode(EntryType::DoubleArray, &wire).unwrap().0, value);

        let strings = EntryValue::from(vec!["b".to_string(), String::new(), "a".to_string()]);
        let wire = encode(&strings);
        assert_eq!(wire, vec![3, 1, b'b', 0, 1, b'a']);
        assert_eq!(decode(EntryType::StringArray, &wire).unwrap().0, strings);
    }

    #[test]
    fn oversized_array_rejected_before_encoding() {
        let mut out = Vec::new();
        let err = put_body(&EntryValue::BooleanArray(vec![true; 256]), &mut out).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TooManyElements);
        assert!(put_body(&EntryValue::BooleanArray(vec![true; MAX_ARRAY_LEN]), &mut out).is_ok());
    }

    #[test]
    fn short_array_is_truncation() {
        let err = decode(EntryType::BooleanArray, &[0x04, 0x01, 0x00]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Truncated);
        let err = decode(EntryType::StringArray, &[0x02, 0x01, b'x']).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedVarint);
    }
}
