//! tablewire core: the entry codec and message envelope of the synchronized
//! table protocol.
//!
//! This crate owns the in-memory binary representation of table entries and
//! control messages and nothing else. It carries no transport or runtime
//! dependencies: bytes come in through a [`protocol::source::ByteSource`] and
//! go out as canonical buffers.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed input always surfaces as `TableWireError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorCode, Result, TableWireError};
pub use protocol::entry::{
    Entry, EntryHeader, EntryId, EntryType, EntryValue, Persistence, SequenceNumber,
};
pub use protocol::message::{Message, MessageKind};
pub use protocol::WireEncode;
