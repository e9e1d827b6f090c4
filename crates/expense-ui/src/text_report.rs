//! Plain-text statistics report.
//!
//! Produces the same five sections as the HTML report, laid out as aligned
//! columns for a terminal or a pipe. Column widths are measured in display
//! cells so labels with wide characters still line up.

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use expense_core::formatting;
use expense_core::models::{BucketStats, StatisticsResult};

const COLUMN_GAP: &str = "  ";

#[derive(Clone, Copy, PartialEq)]
enum Align {
    Left,
    Right,
}

/// Render `stats` as a multi-section text report.
pub fn render_text_report(stats: &StatisticsResult) -> String {
    let mut out = String::new();

    let monthly: Vec<Vec<String>> = stats
        .monthly_stats
        .iter()
        .map(|(month, bucket)| bucket_row(month.to_string(), bucket))
        .collect();
    push_table(&mut out, "Monthly Statistics", &["Month", "Sum", "Max", "Min"], &monthly);

    let yearly: Vec<Vec<String>> = stats
        .yearly_stats
        .iter()
        .map(|(year, bucket)| bucket_row(year.to_string(), bucket))
        .collect();
    push_table(&mut out, "Yearly Statistics", &["Year", "Sum", "Max", "Min"], &yearly);

    let labels: Vec<Vec<String>> = stats
        .label_stats
        .iter()
        .map(|(label, bucket)| {
            let mut row = bucket_row(label.clone(), bucket);
            row.push(
                stats
                    .label_averages
                    .get(label.as_str())
                    .cloned()
                    .unwrap_or_default(),
            );
            row
        })
        .collect();
    push_table(
        &mut out,
        "Label-wise Statistics",
        &["Label", "Sum", "Max", "Min", "Average"],
        &labels,
    );

    push_title(&mut out, "Insights");
    let _ = writeln!(
        out,
        "Total Expenses: {}",
        formatting::format_amount(stats.total_expenses)
    );
    let _ = writeln!(
        out,
        "Average Monthly Expense: {}",
        stats.average_monthly_expense
    );
    let _ = writeln!(out, "Highest Expense Label: {}", stats.highest_expense_label);
    out.push('\n');

    let growth: Vec<Vec<String>> = stats
        .monthly_growth
        .iter()
        .map(|(month, growth)| vec![month.to_string(), formatting::format_percentage(*growth)])
        .collect();
    push_table(
        &mut out,
        "Monthly Expense Growth (%)",
        &["Month", "Growth (%)"],
        &growth,
    );

    // Sections are separated by one blank line; drop the trailing one.
    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

fn bucket_row(key: String, bucket: &BucketStats) -> Vec<String> {
    vec![
        key,
        formatting::format_amount(bucket.sum),
        formatting::format_amount(bucket.max),
        formatting::format_amount(bucket.min),
    ]
}

fn push_title(out: &mut String, title: &str) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&"=".repeat(title.width()));
    out.push('\n');
}

/// Append a titled table. The first column is left-aligned, the rest are
/// right-aligned.
fn push_table(out: &mut String, title: &str, headers: &[&str], rows: &[Vec<String>]) {
    push_title(out, title);

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(out, &header_cells, &widths);

    let rule_width =
        widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(rule_width));
    out.push('\n');

    for row in rows {
        push_row(out, row, &widths);
    }
    out.push('\n');
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        let align = if i == 0 { Align::Left } else { Align::Right };
        line.push_str(&pad(cell, width, align));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.width()));
    match align {
        Align::Left => format!("{cell}{fill}"),
        Align::Right => format!("{fill}{cell}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
