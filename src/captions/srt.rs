//! SubRip (`.srt`) caption parsing.
//!
//! A file is a sequence of numbered blocks separated by blank lines:
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,500
//! first line
//! second line
//! ```
//!
//! Parsing is all-or-nothing: one malformed block fails the whole file.

use crate::captions::entry::{CaptionEntry, CaptionSet};
use crate::foundation::error::VideoBookError;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SrtError {
    #[error("invalid time format: {value:?} (expected HH:MM:SS,mmm)")]
    InvalidTime { value: String },

    #[error("block {index}: invalid timestamp line {line:?}")]
    InvalidTimestampLine { index: String, line: String },

    #[error("block {index}: missing timestamp line")]
    MissingTimestampLine { index: String },

    #[error("block {index}: end {end} is before start {start}")]
    EndBeforeStart { index: String, start: f64, end: f64 },
}

impl From<SrtError> for VideoBookError {
    fn from(e: SrtError) -> Self {
        VideoBookError::parse(e.to_string())
    }
}

/// Convert `HH:MM:SS,mmm` to seconds.
///
/// All four fields are fixed-width decimal digits. Field ranges are not checked: the conversion
/// is the plain linear sum `h*3600 + m*60 + s + ms/1000`.
pub fn parse_srt_time(value: &str) -> Result<f64, SrtError> {
    let invalid = || SrtError::InvalidTime {
        value: value.to_string(),
    };

    let b = value.as_bytes();
    if b.len() != 12 || b[2] != b':' || b[5] != b':' || b[8] != b',' {
        return Err(invalid());
    }

    let field = |range: std::ops::Range<usize>| -> Result<u32, SrtError> {
        let digits = &b[range];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        Ok(digits
            .iter()
            .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0')))
    };

    let hours = field(0..2)?;
    let minutes = field(3..5)?;
    let seconds = field(6..8)?;
    let millis = field(9..12)?;

    Ok(f64::from(hours) * 3600.0
        + f64::from(minutes) * 60.0
        + f64::from(seconds)
        + f64::from(millis) / 1000.0)
}

/// Parse a `start --> end` timestamp line.
fn parse_timestamp_line(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.split_once("-->")?;
    let start = parse_srt_time(start.trim()).ok()?;
    let end = parse_srt_time(end.trim()).ok()?;
    Some((start, end))
}

fn is_index_line(line: &str) -> bool {
    let t = line.trim();
    !t.is_empty() && t.bytes().all(|c| c.is_ascii_digit())
}

/// Split normalized text into runs of non-blank lines.
fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut out = Vec::new();
    let mut cur = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
        } else {
            cur.push(line);
        }
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

/// Parse a whole SRT file.
///
/// Blocks that do not begin with a standalone integer index line are skipped. Every retained
/// block must carry a valid timestamp line, otherwise the whole parse fails.
pub fn parse_srt(raw: &str) -> Result<CaptionSet, SrtError> {
    let normalized = raw.trim_start_matches('\u{feff}').replace("\r\n", "\n");
    let normalized = normalized.trim();

    let mut entries = Vec::new();
    for block in blocks(normalized) {
        let Some((&index_line, rest)) = block.split_first() else {
            continue;
        };
        if !is_index_line(index_line) {
            continue;
        }
        let index = index_line.trim().to_string();

        let Some((&ts_line, text_lines)) = rest.split_first() else {
            return Err(SrtError::MissingTimestampLine { index });
        };
        let Some((start, end)) = parse_timestamp_line(ts_line) else {
            return Err(SrtError::InvalidTimestampLine {
                index,
                line: ts_line.to_string(),
            });
        };
        if end < start {
            return Err(SrtError::EndBeforeStart { index, start, end });
        }

        let text = text_lines.join("\n").trim().to_string();
        entries.push(CaptionEntry { start, end, text });
    }

    Ok(CaptionSet::new(entries))
}
