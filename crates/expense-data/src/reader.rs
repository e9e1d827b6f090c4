//! Acquisition of the raw expense text.
//!
//! The text can come from the command line, a file, or stdin. Whatever the
//! source, surrounding whitespace is trimmed and a blank blob is rejected
//! before it reaches the parser.

use std::io::Read;
use std::path::{Path, PathBuf};

use expense_core::error::{ExpenseError, Result};
use tracing::debug;

/// Where the expense text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Text passed directly, e.g. via `--text`.
    Inline(String),
    /// A file on disk.
    File(PathBuf),
    /// Standard input, read to EOF.
    Stdin,
}

impl InputSource {
    /// Pick the source from the `--text` / `--input` options.
    ///
    /// Inline text wins; an input path of `-` means stdin; with neither,
    /// stdin is read.
    pub fn from_options(text: Option<&str>, input: Option<&Path>) -> Self {
        match (text, input) {
            (Some(text), _) => InputSource::Inline(text.to_string()),
            (None, Some(path)) if path == Path::new("-") => InputSource::Stdin,
            (None, Some(path)) => InputSource::File(path.to_path_buf()),
            (None, None) => InputSource::Stdin,
        }
    }
}

/// Read the expense text from `source`.
///
/// Returns the trimmed text, or [`ExpenseError::EmptyInput`] when nothing but
/// whitespace was supplied.
pub fn read_input(source: &InputSource) -> Result<String> {
    let raw = match source {
        InputSource::Inline(text) => text.clone(),
        InputSource::File(path) => {
            std::fs::read_to_string(path).map_err(|source| ExpenseError::FileRead {
                path: path.clone(),
                source,
            })?
        }
        InputSource::Stdin => return read_input_from(std::io::stdin().lock()),
    };
    non_blank(raw)
}

/// Read the expense text from any reader (stdin in production).
pub fn read_input_from(mut reader: impl Read) -> Result<String> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    non_blank(raw)
}

fn non_blank(raw: String) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExpenseError::EmptyInput);
    }
    debug!(bytes = trimmed.len(), "read expense text");
    Ok(trimmed.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
