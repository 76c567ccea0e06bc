//! Capture loading.

use tablewire_core::error::{Result, TableWireError};

use crate::config::{CaptureEncoding, CaptureSection};

pub async fn load(section: &CaptureSection) -> Result<Vec<u8>> {
    let data = tokio::fs::read(&section.path).await?;
    match section.encoding {
        CaptureEncoding::Raw => Ok(data),
        CaptureEncoding::Hex => decode_hex(&data),
    }
}

/// Decode hex text, skipping ASCII whitespace so dumps may be wrapped.
pub fn decode_hex(text: &[u8]) -> Result<Vec<u8>> {
    let digits: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    hex::decode(digits).map_err(|e| TableWireError::Config(format!("capture is not valid hex: {e}")))
}
