//! Message envelope: `tag:1 body`.
//!
//! The body layout belongs to the message kind. This crate knows the two
//! zero-body control signals; every other tag is carried as
//! [`MessageKind::Other`] with its body left opaque, so new kinds plug in
//! without touching the envelope.

use crate::error::{Result, TableWireError};
use crate::protocol::source::ByteSource;
use crate::protocol::WireEncode;

pub const KEEP_ALIVE_TAG: u8 = 0x00;
pub const SERVER_HELLO_COMPLETE_TAG: u8 = 0x03;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Heartbeat.
    KeepAlive,
    /// Server finished sending its initial entry set.
    ServerHelloComplete,
    /// Tag whose body layout lives outside this crate.
    Other(u8),
}

impl MessageKind {
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            KEEP_ALIVE_TAG => MessageKind::KeepAlive,
            SERVER_HELLO_COMPLETE_TAG => MessageKind::ServerHelloComplete,
            other => MessageKind::Other(other),
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            MessageKind::KeepAlive => KEEP_ALIVE_TAG,
            MessageKind::ServerHelloComplete => SERVER_HELLO_COMPLETE_TAG,
            MessageKind::Other(tag) => tag,
        }
    }

    /// Control signals that never carry a body.
    pub fn is_control(self) -> bool {
        !matches!(self, MessageKind::Other(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    kind: MessageKind,
    /// Tag byte followed by the body.
    canonical: Vec<u8>,
}

impl Message {
    /// Build a message from a tag and body. Control kinds reject a body.
    pub fn new(tag: u8, body: impl Into<Vec<u8>>) -> Result<Self> {
        let body = body.into();
        let kind = MessageKind::from_tag(tag);
        if kind.is_control() && !body.is_empty() {
            return Err(TableWireError::TrailingBytes(body.len()));
        }
        let mut canonical = Vec::with_capacity(1 + body.len());
        canonical.push(tag);
        canonical.extend_from_slice(&body);
        Ok(Self { kind, canonical })
    }

    fn control(kind: MessageKind) -> Self {
        Self {
            kind,
            canonical: vec![kind.tag()],
        }
    }

    pub fn keep_alive() -> Self {
        Self::control(MessageKind::KeepAlive)
    }

    pub fn server_hello_complete() -> Self {
        Self::control(MessageKind::ServerHelloComplete)
    }

    /// Decode one fully-buffered frame: first byte is the tag, the rest is
    /// the body.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let Some((&tag, body)) = frame.split_first() else {
            return Err(TableWireError::Truncated {
                needed: 1,
                available: 0,
            });
        };
        let msg = Self::new(tag, body)?;
        tracing::trace!(tag, body_len = body.len(), "message decoded");
        Ok(msg)
    }

    /// Read one control message off a byte source. Only the tag is consumed;
    /// tags with a body this crate cannot frame are `UnknownType`.
    pub fn read_control<S: ByteSource>(src: &mut S) -> Result<Self> {
        let tag = src.read_u8()?;
        let kind = MessageKind::from_tag(tag);
        if !kind.is_control() {
            tracing::debug!(tag, "no framing known for message tag");
            return Err(TableWireError::UnknownType(tag));
        }
        tracing::trace!(tag, "control message decoded");
        Ok(Self::control(kind))
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn tag(&self) -> u8 {
        self.kind.tag()
    }

    pub fn body(&self) -> &[u8] {
        self.canonical.split_first().map(|(_, body)| body).unwrap_or_default()
    }
}

impl WireEncode for Message {
    fn canonical_bytes(&self) -> &[u8] {
        &self.canonical
    }
}
