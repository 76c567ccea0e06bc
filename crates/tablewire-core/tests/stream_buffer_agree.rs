//! Property tests: the stream and buffer entry points agree, and canonical
//! bytes always equal the decoded input.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use proptest::prelude::*;

use tablewire_core::protocol::source::BufSource;
use tablewire_core::protocol::varint::{encode_uleb128, peek_uleb128, read_uleb128, uleb128_len};
use tablewire_core::protocol::WireEncode;
use tablewire_core::{Entry, EntryHeader, EntryId, EntryValue, Persistence, SequenceNumber};

fn arb_value() -> impl Strategy<Value = EntryValue> {
    prop_oneof![
        any::<bool>().prop_map(EntryValue::Boolean),
        any::<f64>().prop_map(EntryValue::Double),
        ".{0,40}".prop_map(EntryValue::String),
        prop::collection::vec(any::<u8>(), 0..300).prop_map(EntryValue::Raw),
        prop::collection::vec(any::<bool>(), 0..=255).prop_map(EntryValue::BooleanArray),
        prop::collection::vec(any::<f64>(), 0..=255).prop_map(EntryValue::DoubleArray),
        prop::collection::vec(".{0,12}", 0..=40).prop_map(EntryValue::StringArray),
    ]
}

fn arb_header() -> impl Strategy<Value = EntryHeader> {
    (".{0,24}", any::<u16>(), any::<u16>(), any::<u8>()).prop_map(|(name, id, seq, flag)| {
        EntryHeader {
            name,
            id: EntryId::from_raw(id),
            sequence: SequenceNumber::new(seq),
            persistence: Persistence::from_byte(flag),
        }
    })
}

proptest! {
    #[test]
    fn stream_and_buffer_paths_agree(header in arb_header(), value in arb_value()) {
        let entry = Entry::from_parts(header, value).unwrap();
        let wire = entry.canonical_bytes();

        let from_stream = Entry::decode_from_stream(wire).unwrap();
        let from_buffer = Entry::decode_from_buffer(wire).unwrap();

        prop_assert_eq!(&from_stream, &from_buffer);
        prop_assert_eq!(&from_stream, &entry);
        prop_assert_eq!(from_stream.canonical_bytes(), wire);

        let split = Entry::from_items(
            entry.header().clone(),
            entry.entry_type(),
            entry.body_bytes(),
        ).unwrap();
        prop_assert_eq!(&split, &entry);
    }

    #[test]
    fn varint_roundtrip(value in any::<u32>()) {
        let wire = encode_uleb128(value);
        prop_assert_eq!(wire.len(), uleb128_len(value));
        prop_assert_eq!(read_uleb128(&mut BufSource::new(&wire[..])).unwrap(), value);
        let (peeked, raw) = peek_uleb128(&mut BufSource::new(&wire[..])).unwrap();
        prop_assert_eq!(peeked, value);
        prop_assert_eq!(raw, wire);
    }

    #[test]
    fn any_prefix_fails_cleanly(header in arb_header(), value in arb_value(), cut in any::<prop::sample::Index>()) {
        let entry = Entry::from_parts(header, value).unwrap();
        let wire = entry.canonical_bytes();
        let short = &wire[..cut.index(wire.len())];
        prop_assert!(Entry::decode_from_stream(short).is_err());
        prop_assert!(Entry::decode_from_buffer(short).is_err());
    }
}
