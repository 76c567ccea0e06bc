//! tablewire capture inspector.
//!
//! Loads a recorded byte capture of entries or control messages, decodes it
//! frame by frame with `tablewire-core`, and reports each frame along with a
//! check that its canonical bytes reproduce the captured input. Decoding
//! stops at the first bad frame: the codec never resynchronizes.

pub mod capture;
pub mod config;
pub mod report;

use std::io::Write;

use tablewire_core::Result;

use crate::config::InspectConfig;
use crate::report::Report;

/// Load the configured capture, inspect it, and write the report to `out`.
pub async fn run(cfg: &InspectConfig, out: &mut dyn Write) -> Result<Report> {
    let bytes = capture::load(&cfg.capture).await?;
    tracing::info!(path = %cfg.capture.path, bytes = bytes.len(), "capture loaded");

    let report = report::inspect(&bytes, cfg.capture.frames, cfg.report.max_frames);
    report.write(cfg.report.format, out)?;

    match &report.failure {
        Some(f) => tracing::warn!(offset = f.offset, code = f.code, "decode stopped"),
        None => tracing::info!(
            frames = report.frames.len(),
            non_canonical = report.non_canonical(),
            "capture decoded"
        ),
    }
    Ok(report)
}

/// Flush the report sink. `Ok(true)` when every frame decoded and was
/// canonically encoded.
pub fn finish(report: &Report, out: &mut dyn Write) -> Result<bool> {
    out.flush()?;
    Ok(report.failure.is_none() && report.non_canonical() == 0)
}
