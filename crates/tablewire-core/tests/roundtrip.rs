//! Representative round trips for every variant, flag and boundary size.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tablewire_core::protocol::entry::RPC_DEFINITION_TAG;
use tablewire_core::protocol::WireEncode;
use tablewire_core::{Entry, EntryHeader, EntryValue, ErrorCode, Message, Persistence};

fn roundtrip(value: EntryValue) {
    let entry = Entry::new("/rt", value.clone()).unwrap();
    let wire = entry.canonical_bytes().to_vec();

    let from_stream = Entry::decode_from_stream(&wire[..]).unwrap();
    let from_buffer = Entry::decode_from_buffer(&wire).unwrap();

    assert_eq!(from_stream.value(), &value);
    assert_eq!(from_stream, entry);
    assert_eq!(from_buffer, entry);
    assert_eq!(from_stream.canonical_bytes(), &wire[..]);
}

#[test]
fn booleans() {
    roundtrip(EntryValue::Boolean(true));
    roundtrip(EntryValue::Boolean(false));
}

#[test]
fn doubles() {
    for d in [0.0, -0.0, 1.0, f64::MAX, f64::NAN, f64::INFINITY] {
        roundtrip(EntryValue::Double(d));
    }
}

#[test]
fn strings_and_raw() {
    roundtrip(EntryValue::from(""));
    roundtrip(EntryValue::from("grüße, 世界 🤖"));
    roundtrip(EntryValue::Raw(Vec::new()));
    roundtrip(EntryValue::Raw((0..=255u8).cycle().take(300).collect()));
}

#[test]
fn arrays_of_len_0_1_255() {
    for len in [0usize, 1, 255] {
        roundtrip(EntryValue::BooleanArray((0..len).map(|i| i % 3 == 0).collect()));
        roundtrip(EntryValue::DoubleArray((0..len).map(|i| i as f64 * 0.5).collect()));
        roundtrip(EntryValue::StringArray((0..len).map(|i| format!("item-{i}")).collect()));
    }
}

#[test]
fn array_of_256_is_rejected() {
    let err = Entry::new("/too/long", vec![0.0f64; 256]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TooManyElements);
}

#[test]
fn persistence_flags() {
    for flag in [Persistence::Temporary, Persistence::Persist] {
        let header = EntryHeader {
            persistence: flag,
            ..EntryHeader::new("/flag")
        };
        let entry = Entry::from_parts(header, EntryValue::Boolean(true)).unwrap();
        let back = Entry::decode_from_buffer(entry.canonical_bytes()).unwrap();
        assert_eq!(back.persistence(), flag);
        assert_eq!(back.is_persistent(), flag == Persistence::Persist);
    }
}

#[test]
fn rpc_definition_rejected_on_both_paths() {
    let wire = [0x01, b'f', RPC_DEFINITION_TAG, 0xff, 0xff, 0x00, 0x00, 0x00];
    assert_eq!(
        Entry::decode_from_stream(&wire[..]).unwrap_err().code(),
        ErrorCode::UnknownType
    );
    assert_eq!(
        Entry::decode_from_buffer(&wire).unwrap_err().code(),
        ErrorCode::UnknownType
    );
}

#[test]
fn messages() {
    for msg in [Message::keep_alive(), Message::server_hello_complete()] {
        let back = Message::decode(msg.canonical_bytes()).unwrap();
        assert_eq!(back, msg);
        assert!(back.body().is_empty());
    }
}
