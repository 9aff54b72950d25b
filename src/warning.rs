// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2026 The wa2html contributors

//! Non-fatal diagnostics surfaced while parsing and rendering.
//!
//! Neither condition stops the conversion. The parser and renderer collect
//! warnings alongside their output and leave it to the caller to report them.

use crate::parser::TimestampError;
use snafu::prelude::*;
use std::path::PathBuf;

/// A recoverable problem found during conversion.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Warning {
    /// A header's timestamp was not a valid `dd/mm/yyyy, HH:MM:SS`.
    ///
    /// The message is kept with an unknown timestamp.
    #[snafu(display("line {line}: unable to parse the date/time {raw:?}: {source}"))]
    InvalidTimestamp {
        /// One-based line number of the header.
        line: usize,
        /// The text found between the brackets.
        raw: String,
        /// Why it was rejected.
        source: TimestampError,
    },

    /// An attachment marker names a file that is not next to the output.
    ///
    /// The media markup is emitted regardless.
    #[snafu(display("attachment not found: {}", path.display()))]
    MissingAttachment {
        /// The path that was checked.
        path: PathBuf,
    },
}
