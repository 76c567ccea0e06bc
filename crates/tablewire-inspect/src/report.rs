//! Frame-by-frame capture report.

use std::io::Write;

use serde::Serialize;
use serde_json::{json, Value};

use tablewire_core::error::{Result, TableWireError};
use tablewire_core::protocol::source::ReadSource;
use tablewire_core::protocol::WireEncode;
use tablewire_core::{Entry, EntryId, EntryValue, Message, MessageKind};

use crate::config::{FrameKind, ReportFormat};

#[derive(Debug, Serialize)]
pub struct FrameReport {
    pub offset: usize,
    pub len: usize,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `None` for entries still pending assignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent: Option<bool>,
    pub value: Value,
    /// Re-encoding the decoded header and value reproduces the captured
    /// bytes. False for over-long varints or boolean bytes other than
    /// `0x00`/`0x01`, which decode fine but a fresh encoder never emits.
    pub canonical: bool,
}

#[derive(Debug, Serialize)]
pub struct DecodeFailure {
    pub offset: usize,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub frames: Vec<FrameReport>,
    pub failure: Option<DecodeFailure>,
    /// Capture had more frames than `max_frames`.
    pub hit_limit: bool,
}

impl Report {
    pub fn non_canonical(&self) -> usize {
        self.frames.iter().filter(|f| !f.canonical).count()
    }

    pub fn write(&self, format: ReportFormat, out: &mut dyn Write) -> Result<()> {
        match format {
            ReportFormat::Text => self.write_text(out)?,
            ReportFormat::Json => self.write_json(out)?,
        }
        Ok(())
    }

    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for f in &self.frames {
            let id = f.id.map_or_else(|| "-".to_string(), |id| id.to_string());
            writeln!(
                out,
                "{:>8} {:<14} {} id={} seq={} persistent={} value={}{}",
                f.offset,
                f.kind,
                f.name.as_deref().unwrap_or(""),
                id,
                f.sequence.map(|s| s.to_string()).unwrap_or_default(),
                f.persistent.map(|p| p.to_string()).unwrap_or_default(),
                f.value,
                if f.canonical { "" } else { "  [NON-CANONICAL]" },
            )?;
        }
        if let Some(fail) = &self.failure {
            writeln!(out, "{:>8} error {}: {}", fail.offset, fail.code, fail.message)?;
        }
        if self.hit_limit {
            writeln!(out, "stopped after {} frames", self.frames.len())?;
        }
        Ok(())
    }

    fn write_json(&self, out: &mut dyn Write) -> Result<()> {
        for f in &self.frames {
            let line = serde_json::to_string(f)
                .map_err(|e| TableWireError::Config(format!("report encode failed: {e}")))?;
            writeln!(out, "{line}")?;
        }
        if let Some(fail) = &self.failure {
            let line = json!({ "error": fail });
            writeln!(out, "{line}")?;
        }
        if self.hit_limit {
            let line = json!({ "stopped_after": self.frames.len() });
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

/// Walk `capture` front to back, decoding at most `max_frames` frames
/// through the stream entry points over an in-memory reader.
pub fn inspect(capture: &[u8], frames: FrameKind, max_frames: usize) -> Report {
    let mut report = Report::default();
    let mut offset = 0;

    while let Some(rest) = capture.get(offset..).filter(|r| !r.is_empty()) {
        if report.frames.len() >= max_frames {
            report.hit_limit = true;
            break;
        }

        let mut reader = rest;
        let decoded = match frames {
            FrameKind::Entries => Entry::decode_from_stream(&mut reader).map(|e| describe_entry(&e)),
            FrameKind::Messages => {
                Message::read_control(&mut ReadSource::new(&mut reader)).map(|m| describe_message(&m))
            }
        };

        match decoded {
            Ok(mut frame) => {
                frame.offset = offset;
                frame.len = rest.len() - reader.len();
                offset += frame.len;
                report.frames.push(frame);
            }
            Err(e) => {
                report.failure = Some(DecodeFailure {
                    offset,
                    code: e.code().as_str(),
                    message: e.to_string(),
                });
                break;
            }
        }
    }
    report
}

fn describe_entry(entry: &Entry) -> FrameReport {
    let canonical = Entry::from_parts(entry.header().clone(), entry.value().clone())
        .map(|fresh| fresh.canonical_bytes() == entry.canonical_bytes())
        .unwrap_or(false);
    FrameReport {
        offset: 0,
        len: entry.wire_len(),
        kind: entry.entry_type().as_str().to_string(),
        name: Some(entry.name().to_string()),
        id: match entry.id() {
            EntryId::Assigned(id) => Some(id),
            EntryId::Unassigned => None,
        },
        sequence: Some(entry.sequence().get()),
        persistent: Some(entry.is_persistent()),
        value: render_value(entry.value()),
        canonical,
    }
}

fn describe_message(msg: &Message) -> FrameReport {
    let kind = match msg.kind() {
        MessageKind::KeepAlive => "keep_alive".to_string(),
        MessageKind::ServerHelloComplete => "server_hello_done".to_string(),
        MessageKind::Other(tag) => format!("message_0x{tag:02x}"),
    };
    FrameReport {
        offset: 0,
        len: msg.wire_len(),
        kind,
        name: None,
        id: None,
        sequence: None,
        persistent: None,
        value: Value::String(hex::encode(msg.body())),
        // control frames are a lone tag byte
        canonical: msg.body().is_empty(),
    }
}

fn render_double(d: f64) -> Value {
    if d.is_finite() {
        json!(d)
    } else {
        // JSON has no NaN/inf
        Value::String(d.to_string())
    }
}

pub fn render_value(value: &EntryValue) -> Value {
    match value {
        EntryValue::Boolean(b) => json!(b),
        EntryValue::Double(d) => render_double(*d),
        EntryValue::String(s) => json!(s),
        EntryValue::Raw(r) => Value::String(hex::encode(r)),
        EntryValue::BooleanArray(v) => json!(v),
        EntryValue::DoubleArray(v) => Value::Array(v.iter().copied().map(render_double).collect()),
        EntryValue::StringArray(v) => json!(v),
    }
}
