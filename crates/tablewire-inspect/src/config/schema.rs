use serde::Deserialize;
use tablewire_core::error::{Result, TableWireError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InspectConfig {
    pub version: u32,

    pub capture: CaptureSection,

    #[serde(default)]
    pub report: ReportSection,
}

impl InspectConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TableWireError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.capture.validate()?;
        self.report.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureSection {
    pub path: String,

    #[serde(default)]
    pub encoding: CaptureEncoding,

    #[serde(default)]
    pub frames: FrameKind,
}

impl CaptureSection {
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(TableWireError::Config("capture.path must not be empty".into()));
        }
        Ok(())
    }
}

/// How the capture file stores its bytes.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaptureEncoding {
    #[default]
    Raw,
    /// Hex digits; ASCII whitespace is ignored.
    Hex,
}

/// What the capture contains.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    #[default]
    Entries,
    Messages,
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    #[serde(default)]
    pub format: ReportFormat,

    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            max_frames: default_max_frames(),
        }
    }
}

impl ReportSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=1_000_000).contains(&self.max_frames) {
            return Err(TableWireError::Config(
                "report.max_frames must be between 1 and 1000000".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_frames() -> usize {
    10_000
}
