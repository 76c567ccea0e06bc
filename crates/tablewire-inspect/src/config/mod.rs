//! Inspector config loader (strict parsing).

pub mod schema;

use std::fs;

use tablewire_core::error::{Result, TableWireError};

pub use schema::{CaptureEncoding, CaptureSection, FrameKind, InspectConfig, ReportFormat, ReportSection};

pub fn load_from_file(path: &str) -> Result<InspectConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TableWireError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<InspectConfig> {
    let cfg: InspectConfig = serde_yaml::from_str(s)
        .map_err(|e| TableWireError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
