//! Shared error type across tablewire crates.

use thiserror::Error;

/// Stable error codes (used by logs, reports and test vectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Input ended before a fixed-size field was complete.
    Truncated,
    /// Varint did not terminate within 5 bytes or overflowed 32 bits.
    MalformedVarint,
    /// Type tag outside the closed set.
    UnknownType,
    /// String payload is not UTF-8.
    InvalidEncoding,
    /// Bytes left over after a fully-buffered frame.
    TrailingBytes,
    /// Array longer than the 1-byte count allows.
    TooManyElements,
    /// Length not representable as a 32-bit varint.
    PayloadTooLarge,
    /// Underlying reader failed.
    Io,
    /// Invalid inspector configuration.
    Config,
}

impl ErrorCode {
    /// String representation used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Truncated => "TRUNCATED",
            ErrorCode::MalformedVarint => "MALFORMED_VARINT",
            ErrorCode::UnknownType => "UNKNOWN_TYPE",
            ErrorCode::InvalidEncoding => "INVALID_ENCODING",
            ErrorCode::TrailingBytes => "TRAILING_BYTES",
            ErrorCode::TooManyElements => "TOO_MANY_ELEMENTS",
            ErrorCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorCode::Io => "IO",
            ErrorCode::Config => "CONFIG",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TableWireError>;

/// Unified error type used by the codec and the inspector.
///
/// Every decode error is terminal for the frame being decoded; the codec
/// never tries to resynchronize.
#[derive(Debug, Error)]
pub enum TableWireError {
    #[error("truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("malformed varint")]
    MalformedVarint,
    #[error("unknown type tag 0x{0:02x}")]
    UnknownType(u8),
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("{0} trailing bytes after frame")]
    TrailingBytes(usize),
    #[error("too many elements: {0} (max 255)")]
    TooManyElements(usize),
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(String),
}

impl TableWireError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TableWireError::Truncated { .. } => ErrorCode::Truncated,
            TableWireError::MalformedVarint => ErrorCode::MalformedVarint,
            TableWireError::UnknownType(_) => ErrorCode::UnknownType,
            TableWireError::InvalidEncoding(_) => ErrorCode::InvalidEncoding,
            TableWireError::TrailingBytes(_) => ErrorCode::TrailingBytes,
            TableWireError::TooManyElements(_) => ErrorCode::TooManyElements,
            TableWireError::PayloadTooLarge(_) => ErrorCode::PayloadTooLarge,
            TableWireError::Io(_) => ErrorCode::Io,
            TableWireError::Config(_) => ErrorCode::Config,
        }
    }
}
