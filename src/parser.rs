// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2026 The wa2html contributors

//! Line-oriented parsing for WhatsApp chat exports.
//!
//! An export is plain text where each message begins with a header line:
//!
//! ```text
//! [01/02/2024, 09:15:30] Alice: Hello
//! ```
//!
//! Lines that don't look like a header continue the previous message. Blank
//! lines are dropped wherever they appear, including inside a message.
//!
//! # Example
//!
//! ```
//! use wa2html::parser::parse_chat;
//!
//! let chat = parse_chat("[01/02/2024, 09:15:30] Alice: Hello\nthere");
//! assert_eq!(chat.messages.len(), 1);
//! assert_eq!(chat.messages[0].content, "Hello\nthere");
//! assert!(chat.warnings.is_empty());
//! ```

use crate::warning::{InvalidTimestampSnafu, Warning};
use chrono::{NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use serde::Serialize;
use snafu::prelude::*;
use std::str::FromStr;
use std::sync::LazyLock;

/// The timestamp layout WhatsApp writes inside the header brackets, as a
/// chrono format string. Every field is zero-padded.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// `dd/mm/yyyy, HH:MM:SS` and nothing else.
static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4}), ([0-9]{2}):([0-9]{2}):([0-9]{2})$")
        .expect("timestamp pattern is valid")
});

/// Leading direction marks or whitespace, then `[timestamp] sender: content`.
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\x{200E}\x{200F}\s]*\[(.+?)\]\s+(.+?):\s*(.*)$")
        .expect("header pattern is valid")
});

/// When a message was sent, if the header said so legibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// A successfully parsed local date and time.
    Known(NaiveDateTime),
    /// The header's timestamp field could not be parsed.
    Unknown,
}

impl Timestamp {
    /// Returns the parsed date and time, if any.
    #[must_use]
    pub const fn known(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Known(dt) => Some(dt),
            Self::Unknown => None,
        }
    }
}

/// A single message from the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// When the message was sent.
    pub timestamp: Timestamp,

    /// The sender's display name as written in the export.
    pub sender: String,

    /// The message body. Continuation lines are joined with `\n`.
    pub content: String,
}

/// The three fields captured from a header line, borrowed from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    /// Raw text between the brackets.
    pub timestamp: &'a str,
    /// Text between the closing bracket and the first colon.
    pub sender: &'a str,
    /// Everything after the colon and any following whitespace.
    pub content: &'a str,
}

/// Output of [`parse_lines`]: the messages plus anything worth reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedChat {
    /// Messages in input order.
    pub messages: Vec<Message>,
    /// Unparseable timestamps, in input order.
    pub warnings: Vec<Warning>,
}

/// Classifies a line, returning its fields if it starts a new message.
///
/// ```
/// use wa2html::parser::parse_header;
///
/// let header = parse_header("\u{200E}[01/02/2024, 09:15:30] Alice: Hi").unwrap();
/// assert_eq!(header.sender, "Alice");
/// assert!(parse_header("just some text").is_none());
/// ```
#[must_use]
pub fn parse_header(line: &str) -> Option<Header<'_>> {
    let caps = HEADER.captures(line)?;
    Some(Header {
        timestamp: caps.get(1)?.as_str(),
        sender: caps.get(2)?.as_str(),
        content: caps.get(3).map_or("", |m| m.as_str()),
    })
}

/// Why a header timestamp was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum TimestampError {
    /// The text is not laid out as `dd/mm/yyyy, HH:MM:SS`.
    #[snafu(display("expected dd/mm/yyyy, HH:MM:SS"))]
    Layout,

    /// The fields are well formed but name no real date or time.
    #[snafu(display("no such date or time"))]
    OutOfRange,
}

fn field<T: FromStr>(caps: &Captures<'_>, idx: usize) -> Result<T, TimestampError> {
    caps.get(idx)
        .and_then(|m| m.as_str().parse().ok())
        .context(LayoutSnafu)
}

/// Parses a header timestamp such as `01/02/2024, 09:15:30`.
///
/// The layout is exact: two-digit day, month, hour, minute and second, a
/// four-digit year, and a single space after the comma.
///
/// # Errors
///
/// Returns [`TimestampError::Layout`] if the text deviates from
/// [`TIMESTAMP_FORMAT`], and [`TimestampError::OutOfRange`] for impossible
/// values such as month 13 or second 60.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let caps = TIMESTAMP.captures(raw).context(LayoutSnafu)?;
    let day = field(&caps, 1)?;
    let month = field(&caps, 2)?;
    let year = field(&caps, 3)?;
    let hour = field(&caps, 4)?;
    let minute = field(&caps, 5)?;
    let second = field(&caps, 6)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .context(OutOfRangeSnafu)
}

/// A message whose content is still growing.
struct OpenMessage {
    timestamp: Timestamp,
    sender: String,
    content: String,
}

impl OpenMessage {
    fn finish(self) -> Message {
        Message {
            timestamp: self.timestamp,
            sender: self.sender,
            content: self.content,
        }
    }
}

/// Parses export lines into messages.
///
/// A header line closes the message in progress and opens a new one. Any
/// other non-blank line is appended to the open message. Lines before the
/// first header are ignored.
pub fn parse_lines<I, S>(lines: I) -> ParsedChat
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut chat = ParsedChat::default();
    let mut open: Option<OpenMessage> = None;

    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();

        if let Some(header) = parse_header(line) {
            if let Some(done) = open.take() {
                chat.messages.push(done.finish());
            }

            let timestamp = match parse_timestamp(header.timestamp).context(
                InvalidTimestampSnafu {
                    line: idx + 1,
                    raw: header.timestamp,
                },
            ) {
                Ok(dt) => Timestamp::Known(dt),
                Err(warning) => {
                    chat.warnings.push(warning);
                    Timestamp::Unknown
                }
            };

            open = Some(OpenMessage {
                timestamp,
                sender: header.sender.to_owned(),
                content: header.content.to_owned(),
            });
        } else if let Some(msg) = open.as_mut()
            && !line.trim().is_empty()
        {
            msg.content.push('\n');
            msg.content.push_str(line);
        }
    }

    if let Some(done) = open {
        chat.messages.push(done.finish());
    }

    chat
}

/// Parses a whole export held in memory.
///
/// Splits on `\n` or `\r\n` and delegates to [`parse_lines`].
#[must_use]
pub fn parse_chat(text: &str) -> ParsedChat {
    parse_lines(text.lines())
}
