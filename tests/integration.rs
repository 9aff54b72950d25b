// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2026 The wa2html contributors

//! Integration tests for wa2html parsing and rendering.

use std::fs;
use std::path::Path;
use wa2html::parser::{self, Timestamp};
use wa2html::renderer::{self, RenderOptions};
use wa2html::warning::Warning;

const EXPORT: &str = "\
\u{200E}[28/01/2024, 18:02:11] Family: \u{200E}Messages and calls are end-to-end encrypted.
[28/01/2024, 18:05:40] Alice: Are we still on for Sunday?
[28/01/2024, 18:06:02] Bob: Yes!
Bring the cake

I'll bring drinks
[03/02/2024, 12:00:00] Alice: \u{200E}<attached: 00000012-PHOTO-2024-02-03-12-00-00.jpg>
[03/02/2024, 12:00:30] Bob: \u{200E}<attached: 00000013-VIDEO-2024-02-03-12-00-30.mp4>
[03/02/2024, 12:01:00] Bob: \u{200E}<attached: 00000014-Receipt.pdf>
[99/99/2024, 25:00:00] Carol: <b>who</b> & what
";

fn render_in(dir: &Path) -> renderer::RenderedChat {
    let chat = parser::parse_chat(EXPORT);
    let opts = RenderOptions {
        media_dir: dir.to_path_buf(),
        ..Default::default()
    };
    renderer::render_chat(&chat.messages, &opts, Path::exists)
}

#[test]
fn parses_realistic_export() {
    let chat = parser::parse_chat(EXPORT);

    assert_eq!(chat.messages.len(), 7);
    assert_eq!(chat.messages[2].content, "Yes!\nBring the cake\nI'll bring drinks");
    assert_eq!(chat.messages[6].timestamp, Timestamp::Unknown);
    assert_eq!(chat.warnings.len(), 1);
    assert!(matches!(
        &chat.warnings[0],
        Warning::InvalidTimestamp { line: 10, .. }
    ));
}

#[test]
fn renders_groups_and_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let html = render_in(dir.path()).html;

    assert!(html.contains("<li><a href=\"#h-2024-01\">January 2024</a> (3)</li>"));
    assert!(html.contains("<li><a href=\"#h-2024-02\">February 2024</a> (3)</li>"));
    assert!(html.contains("<li><a href=\"#h-unknown\">Unknown date</a> (1)</li>"));

    let jan = html.find("id=\"h-2024-01\"").unwrap();
    let feb = html.find("id=\"h-2024-02\"").unwrap();
    let unknown = html.find("id=\"h-unknown\"").unwrap();
    assert!(jan < feb && feb < unknown);
}

#[test]
fn present_attachments_render_without_warnings() {
    let dir = tempfile::tempdir().unwrap();
    for name in [
        "00000012-PHOTO-2024-02-03-12-00-00.jpg",
        "00000013-VIDEO-2024-02-03-12-00-30.mp4",
        "00000014-Receipt.pdf",
    ] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }

    let page = render_in(dir.path());

    assert!(page.warnings.is_empty(), "unexpected: {:?}", page.warnings);
    assert!(page.html.contains(
        "<img src=\"00000012-PHOTO-2024-02-03-12-00-00.jpg\" alt=\"00000012-PHOTO-2024-02-03-12-00-00.jpg\">"
    ));
    assert!(page.html.contains(
        "<source src=\"00000013-VIDEO-2024-02-03-12-00-30.mp4\" type=\"video/mp4\">"
    ));
    assert!(page.html.contains("<em>[Attachment: 00000014-Receipt.pdf]</em>"));
}

#[test]
fn missing_attachments_warn_and_still_render() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("00000014-Receipt.pdf"), b"x").unwrap();

    let page = render_in(dir.path());

    let missing: Vec<_> = page
        .warnings
        .iter()
        .map(|w| match w {
            Warning::MissingAttachment { path } => path.clone(),
            other => panic!("Expected MissingAttachment, got {other:?}"),
        })
        .collect();
    assert_eq!(
        missing,
        [
            dir.path().join("00000012-PHOTO-2024-02-03-12-00-00.jpg"),
            dir.path().join("00000013-VIDEO-2024-02-03-12-00-30.mp4"),
        ]
    );
    assert!(page.html.contains("<img src=\"00000012-PHOTO-2024-02-03-12-00-00.jpg\""));
    assert!(!page.html.contains("[missing]"));
}

#[test]
fn escapes_untrusted_text() {
    let dir = tempfile::tempdir().unwrap();
    let html = render_in(dir.path()).html;

    assert!(html.contains("&lt;b&gt;who&lt;/b&gt; &amp; what"));
    assert!(html.contains("I&#39;ll bring drinks"));
    assert!(!html.contains("<b>who</b>"));
}

#[test]
fn output_is_stable_across_runs() {
    let dir = tempfile::tempdir().unwrap();

    assert_eq!(render_in(dir.path()), render_in(dir.path()));
}

#[test]
fn two_digit_year_lands_in_sentinel_group() {
    let chat = parser::parse_chat("[01/02/24, 09:15:30] Alice: short year");
    let page = renderer::render_chat(&chat.messages, &RenderOptions::default(), |_| true);

    assert_eq!(chat.messages[0].timestamp, Timestamp::Unknown);
    assert_eq!(chat.warnings.len(), 1);
    assert!(page.html.contains("<h2 id=\"h-unknown\">Unknown date</h2>"));
    assert!(!page.html.contains("0024"));
}
