//! Free-text expense record parser.
//!
//! Scans text for every occurrence of `<amount> - <label> (<DD>/<MM>/<YY>)`,
//! e.g. `12.50 - Food (01/02/21)`, and turns each match into an
//! [`ExpenseRecord`]. Anything between matches is skipped without error.

use expense_core::models::ExpenseRecord;
use regex::Regex;
use tracing::debug;

/// Amount: digits with an optional one- or two-digit fraction.
/// Label: ASCII letters and whitespace only.
/// Date: exactly two digits for each of day, month and year.
const EXPENSE_PATTERN: &str =
    r"([0-9]+(?:\.[0-9]{1,2})?)\s*-\s*([A-Za-z\s]+)\s*\(\s*([0-9]{2}/[0-9]{2}/[0-9]{2})\s*\)";

/// Two-digit years are always read as 20YY.
const CENTURY_BASE: i32 = 2000;

/// Compiled record matcher. Build once and reuse for repeated parsing.
#[derive(Debug, Clone)]
pub struct ExpenseParser {
    pattern: Regex,
}

impl Default for ExpenseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(EXPENSE_PATTERN).expect("regex is valid"),
        }
    }

    /// Extract every well-formed record from `text`, in source order.
    ///
    /// Matches never overlap. `captures_iter` resumes after the end of each
    /// match, and the pattern cannot match the empty string, so the scan
    /// always moves forward and terminates.
    pub fn parse(&self, text: &str) -> Vec<ExpenseRecord> {
        let records: Vec<ExpenseRecord> = self
            .pattern
            .captures_iter(text)
            .filter_map(|caps| build_record(&caps[1], &caps[2], &caps[3]))
            .collect();

        debug!(records = records.len(), bytes = text.len(), "parsed expense text");
        records
    }
}

/// One-shot convenience wrapper around [`ExpenseParser::parse`].
pub fn parse_expenses(text: &str) -> Vec<ExpenseRecord> {
    ExpenseParser::new().parse(text)
}

/// Build a record from the three captured fields.
///
/// The pattern guarantees the numeric fields are well formed; `None` is only
/// a guard against that ever changing.
fn build_record(amount: &str, label: &str, date: &str) -> Option<ExpenseRecord> {
    let amount: f64 = amount.parse().ok()?;

    let mut parts = date.split('/').map(str::parse::<u32>);
    let day = parts.next()?.ok()?;
    let month = parts.next()?.ok()?;
    let yy = parts.next()?.ok()?;

    Some(ExpenseRecord {
        amount,
        label: label.trim().to_string(),
        day,
        month,
        year: CENTURY_BASE + yy as i32,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
