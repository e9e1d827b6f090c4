//! Parse-and-aggregate pipeline.
//!
//! Runs the [`ExpenseParser`] over one text blob, feeds the records to the
//! [`StatisticsAggregator`], and returns an [`AnalysisResult`] ready for a
//! renderer.

use chrono::Utc;
use expense_core::error::Result;
use expense_core::models::{ExpenseRecord, MonthOrdering, StatisticsResult};
use serde::Serialize;
use tracing::info;

use crate::aggregator::StatisticsAggregator;
use crate::parser::ExpenseParser;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Number of records the parser found.
    pub records_parsed: usize,
    /// Month ordering used for the monthly table and growth.
    pub month_ordering: MonthOrdering,
    /// Wall-clock seconds spent parsing.
    pub parse_time_seconds: f64,
    /// Wall-clock seconds spent aggregating.
    pub aggregate_time_seconds: f64,
}

/// The complete output of one analysis pass.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub statistics: StatisticsResult,
    pub records: Vec<ExpenseRecord>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Pretty-printed JSON of the whole result.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ── Analyzer ──────────────────────────────────────────────────────────────────

/// Compiled parser plus configured aggregator, reusable across passes.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    parser: ExpenseParser,
    aggregator: StatisticsAggregator,
}

impl Analyzer {
    pub fn new(month_ordering: MonthOrdering) -> Self {
        Self {
            parser: ExpenseParser::new(),
            aggregator: StatisticsAggregator::with_month_ordering(month_ordering),
        }
    }

    /// Run one full pass over `text`.
    ///
    /// 1. Parse every well-formed record.
    /// 2. Aggregate the records.
    /// 3. Return both with timing metadata.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        // ── Step 1: Parse ─────────────────────────────────────────────────────
        let parse_start = std::time::Instant::now();
        let records = self.parser.parse(text);
        let parse_time = parse_start.elapsed().as_secs_f64();

        // ── Step 2: Aggregate ─────────────────────────────────────────────────
        let aggregate_start = std::time::Instant::now();
        let statistics = self.aggregator.aggregate(&records);
        let aggregate_time = aggregate_start.elapsed().as_secs_f64();

        info!(
            records = records.len(),
            total = statistics.total_expenses,
            top_label = %statistics.highest_expense_label,
            "analysis complete"
        );

        // ── Step 3: Build result ──────────────────────────────────────────────
        let metadata = AnalysisMetadata {
            generated_at: Utc::now().to_rfc3339(),
            records_parsed: records.len(),
            month_ordering: self.aggregator.month_ordering(),
            parse_time_seconds: parse_time,
            aggregate_time_seconds: aggregate_time,
        };

        AnalysisResult {
            statistics,
            records,
            metadata,
        }
    }
}

/// One-shot convenience wrapper around [`Analyzer::analyze`].
pub fn analyze_text(text: &str, month_ordering: MonthOrdering) -> AnalysisResult {
    Analyzer::new(month_ordering).analyze(text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
