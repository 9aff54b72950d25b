// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2026 The wa2html contributors

//! HTML rendering for parsed chat exports.
//!
//! This module turns a list of [`Message`]s into one self-contained HTML page.
//!
//! # Output Format
//!
//! The rendered page includes:
//! - A fixed style block with one border color per sender
//! - A table of contents listing each month and its message count
//! - An `<h2>` per month followed by that month's messages
//! - Inline images and videos in place of attachment markers
//! - A short attribution footer
//!
//! Output depends only on the messages, the options and the answers of the
//! existence check, so rendering the same input twice gives identical bytes.
//!
//! # Example
//!
//! ```
//! use wa2html::parser::parse_chat;
//! use wa2html::renderer::{render_chat, RenderOptions};
//!
//! let chat = parse_chat("[01/02/2024, 09:15:30] Alice: Hello!");
//! let page = render_chat(&chat.messages, &RenderOptions::default(), |_| true);
//!
//! assert!(page.html.contains("February 2024"));
//! assert!(page.html.contains("Hello!"));
//! ```

use crate::attachment::resolve_attachments;
use crate::parser::{Message, Timestamp};
use crate::warning::Warning;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Configuration options for HTML rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Page title, used for both `<title>` and the `<h1>`.
    pub title: String,

    /// Directory the page will be written to.
    ///
    /// Attachments are referenced relative to it and checked for there.
    pub media_dir: PathBuf,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Chat Export".into(),
            media_dir: PathBuf::from("."),
        }
    }
}

/// A finished page and the warnings raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChat {
    /// The complete HTML document.
    pub html: String,
    /// Missing attachments, in document order.
    pub warnings: Vec<Warning>,
}

/// Escapes the five HTML-significant characters.
///
/// `&` is replaced first so existing entities are escaped exactly once.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Distinct sender names in sorted order.
///
/// A sender's position in this list picks its `sender-N` style class, so
/// the same set of names always gets the same colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderRegistry {
    names: Vec<String>,
}

impl SenderRegistry {
    /// Collects the distinct senders of `messages`.
    #[must_use]
    pub fn from_messages(messages: &[Message]) -> Self {
        let names: BTreeSet<&str> = messages.iter().map(|m| m.sender.as_str()).collect();
        Self {
            names: names.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Returns the zero-based color index for `sender`.
    #[must_use]
    pub fn index_of(&self, sender: &str) -> Option<usize> {
        self.names
            .binary_search_by(|name| name.as_str().cmp(sender))
            .ok()
    }

    /// The sorted names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// The month a message falls into, or the bucket for unparsed timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GroupKey {
    Month { year: i32, month: u32 },
    Unknown,
}

impl GroupKey {
    fn of(timestamp: &Timestamp) -> Self {
        match timestamp {
            Timestamp::Known(dt) => Self::Month {
                year: dt.year(),
                month: dt.month(),
            },
            Timestamp::Unknown => Self::Unknown,
        }
    }

    fn id(self) -> String {
        match self {
            Self::Month { year, month } => format!("{year:04}-{month:02}"),
            Self::Unknown => "unknown".into(),
        }
    }

    fn name(self) -> String {
        match self {
            Self::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1)
                .map_or_else(|| format!("{year:04}-{month:02}"), |d| {
                    d.format("%B %Y").to_string()
                }),
            Self::Unknown => "Unknown date".into(),
        }
    }
}

/// The messages of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageGroup<'a> {
    /// Slug such as `2024-03`, or `unknown` for the sentinel group.
    pub id: String,
    /// Label such as `March 2024`.
    pub name: String,
    /// Members in their original order.
    pub messages: Vec<&'a Message>,
}

impl MessageGroup<'_> {
    /// Number of messages in the group.
    #[must_use]
    pub fn count(&self) -> usize {
        self.messages.len()
    }
}

/// Buckets messages by month in a single forward pass.
///
/// Groups appear in the order their first message does. Messages without a
/// known timestamp share one sentinel group.
#[must_use]
pub fn group_by_month(messages: &[Message]) -> Vec<MessageGroup<'_>> {
    let mut groups: Vec<MessageGroup<'_>> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for msg in messages {
        let key = GroupKey::of(&msg.timestamp);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(MessageGroup {
                id: key.id(),
                name: key.name(),
                messages: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].messages.push(msg);
    }

    groups
}

/// Hands out per-message anchor ids, suffixing repeats with `-2`, `-3`, ...
#[derive(Default)]
struct Anchors {
    seen: HashMap<String, usize>,
}

impl Anchors {
    fn next(&mut self, timestamp: &Timestamp) -> String {
        let base = match timestamp {
            Timestamp::Known(dt) => format!("m-{}", dt.format("%Y-%m-%d_%H-%M-%S")),
            Timestamp::Unknown => "m-unknown".into(),
        };
        let n = self.seen.entry(base.clone()).or_insert(0);
        *n += 1;
        if *n == 1 { base } else { format!("{base}-{n}") }
    }
}

fn display_timestamp(timestamp: &Timestamp) -> String {
    timestamp.known().map_or_else(
        || "Unknown date".into(),
        |dt| dt.format("%a %d %b %Y - %H:%M:%S").to_string(),
    )
}

const STYLE: &str = "\
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f5f5;
        }
        .chat-container {
            background-color: white;
            border-radius: 8px;
            padding: 20px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .message {
            margin-bottom: 16px;
            padding: 12px;
            border-left: 3px solid #007bff;
            background-color: #f8f9fa;
            border-radius: 4px;
        }
        .message.sender-0 { border-left-color: #2563eb; }
        .message.sender-1 { border-left-color: #0891b2; }
        .message.sender-2 { border-left-color: #16a34a; }
        .message.sender-3 { border-left-color: #9333ea; }
        .message.sender-4 { border-left-color: #ea580c; }
        .message.sender-5 { border-left-color: #db2777; }
        .message-header {
            display: flex;
            justify-content: space-between;
            margin-bottom: 8px;
        }
        .sender {
            font-weight: bold;
            color: #333;
        }
        .timestamp, .timestamp a {
            color: #666;
            font-size: 0.9em;
            text-decoration: none;
        }
        .content {
            color: #333;
            white-space: pre-wrap;
            word-wrap: break-word;
        }
        .content img, .content video {
            max-width: 100%;
            height: auto;
            margin-top: 8px;
            border-radius: 4px;
        }
        h1 {
            color: #333;
            margin-bottom: 20px;
        }
        .toc-link {
            text-align: right;
            font-size: 0.6em;
        }
        .attribution {
            margin-top: 24px;
            text-align: center;
            color: #999;
            font-size: 0.8em;
        }
";

/// Renders messages as a complete HTML document.
///
/// `exists` is asked once per attachment marker whether the file is present
/// under [`RenderOptions::media_dir`].
pub fn render_chat<F>(messages: &[Message], opts: &RenderOptions, exists: F) -> RenderedChat
where
    F: Fn(&Path) -> bool,
{
    let senders = SenderRegistry::from_messages(messages);
    let groups = group_by_month(messages);
    let title = escape_html(&opts.title);
    let mut warnings = Vec::new();
    let mut out = String::new();

    writeln!(
        out,
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
    <meta charset=\"UTF-8\">
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
    <title>{title}</title>
    <style>
{STYLE}    </style>
</head>
<body>
    <div class=\"chat-container\">
        <h1>{title}</h1>"
    )
    .unwrap();

    render_toc(&mut out, &groups);

    let mut anchors = Anchors::default();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push_str("<p class=\"toc-link\"><a href=\"#toc\">Table of contents</a></p>\n");
        }
        writeln!(
            out,
            "<h2 id=\"h-{}\">{}</h2>",
            group.id,
            escape_html(&group.name)
        )
        .unwrap();

        for msg in &group.messages {
            let anchor = anchors.next(&msg.timestamp);
            let content = resolve_attachments(
                &escape_html(&msg.content),
                &opts.media_dir,
                &exists,
                &mut warnings,
            );
            render_message(&mut out, msg, &anchor, &senders, &content);
        }
    }

    writeln!(
        out,
        "        <footer class=\"attribution\">Generated by {} {}</footer>
    </div>
</body>
</html>",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    )
    .unwrap();

    RenderedChat { html: out, warnings }
}

fn render_toc(out: &mut String, groups: &[MessageGroup<'_>]) {
    out.push_str("<ul id=\"toc\">\n");
    for group in groups {
        writeln!(
            out,
            "<li><a href=\"#h-{}\">{}</a> ({})</li>",
            group.id,
            escape_html(&group.name),
            group.count()
        )
        .unwrap();
    }
    out.push_str("</ul>\n");
}

fn render_message(
    out: &mut String,
    msg: &Message,
    anchor: &str,
    senders: &SenderRegistry,
    content: &str,
) {
    let sender_class = senders.index_of(&msg.sender).unwrap_or_default();
    writeln!(
        out,
        "<div id=\"{anchor}\" class=\"message sender-{sender_class}\">
    <div class=\"message-header\">
        <span class=\"sender\">{}</span>
        <span class=\"timestamp\"><a href=\"#{anchor}\">{}</a></span>
    </div>
    <div class=\"content\">{content}</div>
</div>",
        escape_html(&msg.sender),
        display_timestamp(&msg.timestamp),
    )
    .unwrap();
}
