// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2026 The wa2html contributors

//! Attachment markers and the media markup that replaces them.
//!
//! WhatsApp writes `<attached: 00000012-PHOTO-2024-02-01-09-15-30.jpg>` in
//! place of a shared file. Content is HTML-escaped before it gets here, so the
//! scan looks for the escaped form `&lt;attached: ...&gt;`.

use crate::warning::{MissingAttachmentSnafu, Warning};
use regex::Regex;
use std::fmt::Write;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

/// The escaped marker. The filename runs up to the next `&`.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&lt;attached:\s*([^&]+)&gt;").expect("attachment pattern is valid")
});

/// How an attachment is presented, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Shown inline with `<img>`.
    Image,
    /// Played inline with `<video>`.
    Video {
        /// MIME type for the `<source>` element.
        mime: &'static str,
    },
    /// Anything else; only the filename is shown.
    Other,
}

const IMAGE_EXTENSIONS: &[&str] = &["gif", "jpg", "png"];

const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("ogg", "video/ogg"),
    ("ogv", "video/ogg"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("3gp", "video/3gpp"),
    ("3g2", "video/3gpp2"),
];

/// Picks the presentation for a filename, ignoring extension case.
///
/// ```
/// use wa2html::attachment::{classify, AttachmentKind};
///
/// assert_eq!(classify("IMG.JPG"), AttachmentKind::Image);
/// assert_eq!(classify("clip.mov"), AttachmentKind::Video { mime: "video/quicktime" });
/// assert_eq!(classify("notes.pdf"), AttachmentKind::Other);
/// ```
#[must_use]
pub fn classify(filename: &str) -> AttachmentKind {
    let Some(ext) = Path::new(filename).extension().and_then(|e| e.to_str()) else {
        return AttachmentKind::Other;
    };
    let ext = ext.to_ascii_lowercase();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return AttachmentKind::Image;
    }
    VIDEO_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or(AttachmentKind::Other, |&(_, mime)| AttachmentKind::Video {
            mime,
        })
}

/// One marker occurrence within escaped content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker<'a> {
    /// Byte range of the whole marker, entities included.
    pub span: Range<usize>,
    /// The filename with surrounding whitespace trimmed.
    pub filename: &'a str,
}

/// Lazily yields every attachment marker in already-escaped content.
pub fn find_markers(escaped: &str) -> impl Iterator<Item = Marker<'_>> {
    MARKER.captures_iter(escaped).filter_map(|caps| {
        let whole = caps.get(0)?;
        Some(Marker {
            span: whole.range(),
            filename: caps.get(1)?.as_str().trim(),
        })
    })
}

/// Writes the markup for one attachment.
fn write_media(out: &mut String, filename: &str) {
    match classify(filename) {
        AttachmentKind::Image => {
            write!(out, "<br><img src=\"{filename}\" alt=\"{filename}\">").unwrap();
        }
        AttachmentKind::Video { mime } => {
            write!(
                out,
                "<br><video controls><source src=\"{filename}\" type=\"{mime}\">\
                 Your browser does not support the video tag.</video>"
            )
            .unwrap();
        }
        AttachmentKind::Other => {
            write!(out, "<br><em>[Attachment: {filename}]</em>").unwrap();
        }
    }
}

/// Replaces each marker in `escaped` with media markup.
///
/// Every filename is looked up relative to `media_dir` with `exists`. A
/// missing file adds a [`Warning::MissingAttachment`] but the markup is
/// emitted all the same.
pub fn resolve_attachments<F>(
    escaped: &str,
    media_dir: &Path,
    exists: F,
    warnings: &mut Vec<Warning>,
) -> String
where
    F: Fn(&Path) -> bool,
{
    let mut out = String::with_capacity(escaped.len());
    let mut last = 0;

    for marker in find_markers(escaped) {
        out.push_str(&escaped[last..marker.span.start]);

        let path = media_dir.join(marker.filename);
        if !exists(&path) {
            warnings.push(MissingAttachmentSnafu { path }.build());
        }
        write_media(&mut out, marker.filename);

        last = marker.span.end;
    }
    out.push_str(&escaped[last..]);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(escaped: &str, present: bool) -> (String, Vec<Warning>) {
        let mut warnings = Vec::new();
        let out = resolve_attachments(escaped, Path::new("/media"), |_| present, &mut warnings);
        (out, warnings)
    }

    #[test]
    fn classifies_images_case_insensitively() {
        assert_eq!(classify("a.gif"), AttachmentKind::Image);
        assert_eq!(classify("a.Png"), AttachmentKind::Image);
        assert_eq!(classify("a.JPG"), AttachmentKind::Image);
    }

    #[test]
    fn classifies_video_mime_types() {
        assert_eq!(classify("a.mp4"), AttachmentKind::Video { mime: "video/mp4" });
        assert_eq!(classify("a.ogv"), AttachmentKind::Video { mime: "video/ogg" });
        assert_eq!(classify("a.3G2"), AttachmentKind::Video { mime: "video/3gpp2" });
        assert_eq!(classify("a.avi"), AttachmentKind::Video { mime: "video/x-msvideo" });
    }

    #[test]
    fn classifies_unknown_and_extensionless_as_other() {
        assert_eq!(classify("doc.pdf"), AttachmentKind::Other);
        assert_eq!(classify("README"), AttachmentKind::Other);
        assert_eq!(classify("voice.opus"), AttachmentKind::Other);
    }

    #[test]
    fn finds_markers_with_spans() {
        let text = "see &lt;attached:  photo.png &gt; and &lt;attached: b.mp4&gt;";
        let markers: Vec<_> = find_markers(text).collect();

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].filename, "photo.png");
        assert_eq!(&text[markers[0].span.clone()], "&lt;attached:  photo.png &gt;");
        assert_eq!(markers[1].filename, "b.mp4");
    }

    #[test]
    fn ignores_unescaped_markers() {
        assert_eq!(find_markers("<attached: a.png>").count(), 0);
    }

    #[test]
    fn replaces_image_marker() {
        let (out, warnings) = resolve("&lt;attached: photo.png&gt;", true);

        assert_eq!(out, "<br><img src=\"photo.png\" alt=\"photo.png\">");
        assert!(warnings.is_empty());
    }

    #[test]
    fn replaces_video_marker_with_source_type() {
        let (out, _) = resolve("&lt;attached: clip.mp4&gt;", true);

        assert!(out.starts_with("<br><video controls>"));
        assert!(out.contains("<source src=\"clip.mp4\" type=\"video/mp4\">"));
        assert!(out.contains("does not support the video tag"));
    }

    #[test]
    fn replaces_other_marker_with_placeholder() {
        let (out, _) = resolve("&lt;attached: notes.pdf&gt;", true);

        assert_eq!(out, "<br><em>[Attachment: notes.pdf]</em>");
    }

    #[test]
    fn missing_file_warns_but_keeps_markup() {
        let (out, warnings) = resolve("&lt;attached: photo.png&gt;", false);

        assert_eq!(out, "<br><img src=\"photo.png\" alt=\"photo.png\">");
        assert_eq!(
            warnings,
            vec![Warning::MissingAttachment {
                path: Path::new("/media").join("photo.png"),
            }]
        );
    }

    #[test]
    fn keeps_surrounding_text() {
        let (out, _) = resolve("before\n&lt;attached: a.gif&gt;\nafter", true);

        assert_eq!(out, "before\n<br><img src=\"a.gif\" alt=\"a.gif\">\nafter");
    }

    #[test]
    fn checks_each_occurrence() {
        let (_, warnings) = resolve("&lt;attached: a.png&gt; &lt;attached: a.png&gt;", false);

        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn leaves_content_without_markers_alone() {
        let (out, warnings) = resolve("x &lt; y &amp;&amp; y &gt; z", true);

        assert_eq!(out, "x &lt; y &amp;&amp; y &gt; z");
        assert!(warnings.is_empty());
    }
}
