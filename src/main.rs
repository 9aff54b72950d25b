// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2026 The wa2html contributors

//! Command-line interface for wa2html.
//!
//! This binary provides the `wa2html` command for converting WhatsApp chat
//! exports from plain text to a single HTML page.

use lexopt::prelude::*;
use snafu::{ensure, prelude::*};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use wa2html::warning::Warning;
use wa2html::{parser, renderer};

/// The file name WhatsApp gives the transcript inside an export.
const EXPORT_FILE_NAME: &str = "_chat.txt";

/// Where to write the rendered output.
#[derive(Clone)]
enum OutputTarget {
    /// Next to each input, as `chat.html` or `chat.json`.
    Beside,
    /// Write to the given file.
    File(PathBuf),
    /// Write to stdout.
    Stdout,
}

#[allow(clippy::struct_excessive_bools)]
struct Cli {
    input: Vec<PathBuf>,
    output: OutputTarget,
    title: Option<String>,
    json: bool,
    quiet: bool,
    dry_run: bool,
    force: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("at least one input file or directory is required"))]
    NoInputFiles,

    #[snafu(display("no _chat.txt found under the given inputs"))]
    NoExportsFound,

    #[snafu(display("--output can only be used with a single export"))]
    MultipleFilesToOutput,

    #[snafu(display("input not found: {}", path.display()))]
    InputNotFound { path: PathBuf },

    #[snafu(display("failed to create output directory: {source}"))]
    CreateOutputDir { source: std::io::Error },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to serialize {}: {source}", path.display()))]
    SerializeJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert WhatsApp chat exports to HTML

Usage: {name} [OPTIONS] <INPUT>...

Arguments:
  <INPUT>...  Exported {EXPORT_FILE_NAME} files or directories containing exports

Options:
  -o, --output <OUTPUT>     Output file, or - for stdout (default: chat.html beside each input)
      --title <TEXT>        Document title (default: Chat Export)
      --json                Write the parsed messages as JSON instead of HTML

Other options:
  -q, --quiet               Suppress progress messages and warnings
  -n, --dry-run             Show what would be processed without writing
  -f, --force               Overwrite existing output files
  -h, --help                Print help
  -V, --version             Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut input = Vec::new();
    let mut output = OutputTarget::Beside;
    let mut title = None;
    let mut json = false;
    let mut quiet = false;
    let mut dry_run = false;
    let mut force = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => {
                let val: PathBuf = parser.value()?.parse()?;
                output = if val == Path::new("-") {
                    OutputTarget::Stdout
                } else {
                    OutputTarget::File(val)
                };
            }
            Long("title") => title = Some(parser.value()?.string()?),
            Long("json") => json = true,
            Short('q') | Long("quiet") => quiet = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('f') | Long("force") => force = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => input.push(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        input,
        output,
        title,
        json,
        quiet,
        dry_run,
        force,
    })
}

fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;

    ensure!(!cli.input.is_empty(), NoInputFilesSnafu);

    let files = collect_input_files(&cli.input)?;
    ensure!(!files.is_empty(), NoExportsFoundSnafu);

    match &cli.output {
        OutputTarget::Beside => {
            for file in &files {
                let dir = file.parent().unwrap_or_else(|| Path::new("."));
                let name = if cli.json { "chat.json" } else { "chat.html" };
                process_file(file, &dir.join(name), &cli)?;
            }
        }
        OutputTarget::File(path) => {
            ensure!(files.len() == 1, MultipleFilesToOutputSnafu);
            if !cli.dry_run
                && let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).context(CreateOutputDirSnafu)?;
            }
            process_file(&files[0], path, &cli)?;
        }
        OutputTarget::Stdout => {
            ensure!(files.len() == 1, MultipleFilesToOutputSnafu);
            process_to_stdout(&files[0], &cli)?;
        }
    }

    Ok(())
}

/// Collects export transcripts from the given inputs (files and directories).
///
/// Files are taken as given. Directories are searched for `_chat.txt`.
fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file() && e.file_name() == EXPORT_FILE_NAME)
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            ensure!(input.exists(), InputNotFoundSnafu { path: input });
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Creates render options for an output placed in `media_dir`.
fn make_render_options(cli: &Cli, media_dir: &Path) -> renderer::RenderOptions {
    let mut opts = renderer::RenderOptions {
        media_dir: media_dir.to_path_buf(),
        ..Default::default()
    };
    if let Some(title) = &cli.title {
        opts.title.clone_from(title);
    }
    opts
}

/// Prints warnings to stderr unless `--quiet` was given.
fn report_warnings(input: &Path, warnings: &[Warning], cli: &Cli) {
    if cli.quiet {
        return;
    }
    for warning in warnings {
        eprintln!("warning: {}: {warning}", input.display());
    }
}

/// Reads, parses and renders one export.
///
/// Returns the document text and the number of messages it holds.
fn convert(input: &Path, media_dir: &Path, cli: &Cli) -> Result<(String, usize), Error> {
    let text = std::fs::read_to_string(input).context(ReadFileSnafu { path: input })?;
    let chat = parser::parse_chat(&text);
    report_warnings(input, &chat.warnings, cli);

    let count = chat.messages.len();
    if cli.json {
        let json =
            serde_json::to_string_pretty(&chat.messages).context(SerializeJsonSnafu { path: input })?;
        return Ok((json + "\n", count));
    }

    let opts = make_render_options(cli, media_dir);
    let page = renderer::render_chat(&chat.messages, &opts, Path::exists);
    report_warnings(input, &page.warnings, cli);

    Ok((page.html, count))
}

/// Processes a single export and writes it to stdout.
///
/// Attachments are checked for next to the input.
fn process_to_stdout(input: &Path, cli: &Cli) -> Result<(), Error> {
    if cli.dry_run {
        eprintln!("Would output {}", input.display());
        return Ok(());
    }

    let media_dir = input.parent().unwrap_or_else(|| Path::new("."));
    let (document, _) = convert(input, media_dir, cli)?;

    print!("{document}");
    Ok(())
}

/// Processes a single export and writes it to `out_path`.
fn process_file(input: &Path, out_path: &Path, cli: &Cli) -> Result<(), Error> {
    // Handle dry-run mode
    if cli.dry_run {
        eprintln!("Would write {}", out_path.display());
        return Ok(());
    }

    // Check if output exists and handle overwrite
    if out_path.exists() && !cli.force {
        eprintln!(
            "Skipping {} (already exists, use --force to overwrite)",
            out_path.display()
        );
        return Ok(());
    }

    let media_dir = out_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let (document, count) = convert(input, media_dir, cli)?;

    std::fs::write(out_path, &document).context(WriteFileSnafu { path: out_path })?;

    if !cli.quiet {
        eprintln!("Wrote {} ({count} messages)", out_path.display());
    }
    Ok(())
}
