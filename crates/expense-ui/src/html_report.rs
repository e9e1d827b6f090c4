//! HTML fragment report.
//!
//! Emits five sections back to back (`<h2>` heading then a `<table>`, or a
//! `<ul>` for the insights), ready to be dropped into a page body.

use std::fmt::Write;

use expense_core::formatting;
use expense_core::models::{BucketStats, StatisticsResult};

/// Render `stats` as an HTML fragment.
pub fn render_html_report(stats: &StatisticsResult) -> String {
    let mut html = String::new();

    open_table(&mut html, "Monthly Statistics", &["Month", "Sum", "Max", "Min"]);
    for (month, bucket) in stats.monthly_stats.iter() {
        push_row(&mut html, &bucket_cells(&month.to_string(), bucket));
    }
    html.push_str("</table>\n");

    open_table(&mut html, "Yearly Statistics", &["Year", "Sum", "Max", "Min"]);
    for (year, bucket) in stats.yearly_stats.iter() {
        push_row(&mut html, &bucket_cells(&year.to_string(), bucket));
    }
    html.push_str("</table>\n");

    open_table(
        &mut html,
        "Label-wise Statistics",
        &["Label", "Sum", "Max", "Min", "Average"],
    );
    for (label, bucket) in stats.label_stats.iter() {
        let mut cells = bucket_cells(label, bucket);
        cells.push(
            stats
                .label_averages
                .get(label.as_str())
                .cloned()
                .unwrap_or_default(),
        );
        push_row(&mut html, &cells);
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Insights</h2>\n<ul>\n");
    push_insight(
        &mut html,
        "Total Expenses",
        &formatting::format_amount(stats.total_expenses),
    );
    push_insight(
        &mut html,
        "Average Monthly Expense",
        &stats.average_monthly_expense,
    );
    push_insight(
        &mut html,
        "Highest Expense Label",
        &stats.highest_expense_label,
    );
    html.push_str("</ul>\n");

    open_table(&mut html, "Monthly Expense Growth (%)", &["Month", "Growth (%)"]);
    for (month, growth) in stats.monthly_growth.iter() {
        push_row(
            &mut html,
            &[month.to_string(), formatting::format_percentage(*growth)],
        );
    }
    html.push_str("</table>\n");

    html
}

/// Escape the five characters that are significant in HTML text and
/// attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn bucket_cells(key: &str, bucket: &BucketStats) -> Vec<String> {
    vec![
        key.to_string(),
        formatting::format_amount(bucket.sum),
        formatting::format_amount(bucket.max),
        formatting::format_amount(bucket.min),
    ]
}

fn open_table(html: &mut String, title: &str, headers: &[&str]) {
    let _ = write!(html, "<h2>{}</h2>\n<table>\n<tr>", escape_html(title));
    for header in headers {
        let _ = write!(html, "<th>{}</th>", escape_html(header));
    }
    html.push_str("</tr>\n");
}

fn push_row(html: &mut String, cells: &[String]) {
    html.push_str("<tr>");
    for cell in cells {
        let _ = write!(html, "<td>{}</td>", escape_html(cell));
    }
    html.push_str("</tr>\n");
}

fn push_insight(html: &mut String, name: &str, value: &str) {
    let _ = writeln!(
        html,
        "<li><strong>{}:</strong> {}</li>",
        escape_html(name),
        escape_html(value)
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
