// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2026 The wa2html contributors

//! Convert WhatsApp chat exports to a single HTML page.
//!
//! This crate provides parsing and rendering functionality for transforming
//! the `_chat.txt` file of a WhatsApp export into a styled, self-contained
//! document for reading and archival.
//!
//! # Overview
//!
//! 1. [`parser`] turns raw lines into [`parser::Message`]s, joining
//!    continuation lines onto the message they belong to
//! 2. [`renderer`] groups the messages by month and writes the HTML,
//!    replacing attachment markers with inline media
//!
//! Neither step fails on odd input. Problems such as an unreadable timestamp
//! or a missing attachment come back as [`warning::Warning`]s.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use wa2html::{parser, renderer};
//!
//! let text = std::fs::read_to_string("export/_chat.txt").unwrap();
//! let chat = parser::parse_chat(&text);
//!
//! let opts = renderer::RenderOptions {
//!     media_dir: "export".into(),
//!     ..Default::default()
//! };
//!
//! let page = renderer::render_chat(&chat.messages, &opts, Path::exists);
//! std::fs::write("export/chat.html", page.html).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`parser`]: header-line recognition and message assembly
//! - [`renderer`]: month grouping, escaping and HTML generation
//! - [`attachment`]: attachment marker scanning and media markup
//! - [`warning`]: non-fatal diagnostics

#![deny(missing_docs)]

pub mod attachment;
pub mod parser;
pub mod renderer;
pub mod warning;
