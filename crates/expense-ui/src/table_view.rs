//! Statistics table views for the interactive TUI.
//!
//! Lays out a summary line above four bordered [`ratatui::widgets::Table`]s:
//! monthly and yearly on top, label-wise and growth below.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use expense_core::formatting;
use expense_core::models::{BucketStats, StatisticsResult};

use crate::components::indicators::{GrowthIndicator, SummaryIndicator};
use crate::themes::Theme;

const KEY_WIDTH: u16 = 16;
const AMOUNT_WIDTH: u16 = 12;

/// Render every statistics section into `area`.
pub fn render_statistics(frame: &mut Frame, area: Rect, stats: &StatisticsResult, theme: &Theme) {
    let [summary_area, top_area, bottom_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ])
    .areas(area);
    let [monthly_area, yearly_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(top_area);
    let [label_area, growth_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .areas(bottom_area);

    let summary = SummaryIndicator::new(
        stats.total_expenses,
        &stats.average_monthly_expense,
        &stats.highest_expense_label,
        theme,
    );
    frame.render_widget(
        Paragraph::new(summary.to_line()).block(titled_block(" Insights ")),
        summary_area,
    );

    let monthly = stats
        .monthly_stats
        .iter()
        .map(|(month, bucket)| (month.to_string(), bucket));
    frame.render_widget(
        bucket_table(" Monthly Statistics ", "Month", monthly, theme),
        monthly_area,
    );

    let yearly = stats
        .yearly_stats
        .iter()
        .map(|(year, bucket)| (year.to_string(), bucket));
    frame.render_widget(
        bucket_table(" Yearly Statistics ", "Year", yearly, theme),
        yearly_area,
    );

    frame.render_widget(label_table(stats, theme), label_area);
    frame.render_widget(growth_table(stats, theme), growth_area);
}

/// Render a "no data" placeholder when parsing found nothing.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No expense records found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Records look like: 12.50 - Food (01/02/21)",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(titled_block(" Statistics ")),
        area,
    );
}

// ── Table builders ───────────────────────────────────────────────────────────

fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
}

fn header_row<'a>(titles: &[&'a str], theme: &Theme) -> Row<'a> {
    Row::new(
        titles
            .iter()
            .map(|t| Cell::from(*t).style(theme.table_header)),
    )
    .height(1)
}

fn amount_cells(bucket: &BucketStats) -> [Cell<'static>; 3] {
    [
        Cell::from(formatting::format_amount(bucket.sum)),
        Cell::from(formatting::format_amount(bucket.max)),
        Cell::from(formatting::format_amount(bucket.min)),
    ]
}

fn bucket_table<'a>(
    title: &str,
    key_title: &'a str,
    buckets: impl Iterator<Item = (String, &'a BucketStats)>,
    theme: &Theme,
) -> Table<'a> {
    let rows: Vec<Row> = buckets
        .enumerate()
        .map(|(i, (key, bucket))| {
            let mut cells = vec![Cell::from(key)];
            cells.extend(amount_cells(bucket));
            Row::new(cells).style(theme.row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(KEY_WIDTH),
        Constraint::Length(AMOUNT_WIDTH),
        Constraint::Length(AMOUNT_WIDTH),
        Constraint::Length(AMOUNT_WIDTH),
    ];

    Table::new(rows, widths)
        .header(header_row(&[key_title, "Sum", "Max", "Min"], theme))
        .block(titled_block(title))
        .style(theme.text)
}

fn label_table<'a>(stats: &'a StatisticsResult, theme: &Theme) -> Table<'a> {
    let rows: Vec<Row> = stats
        .label_stats
        .iter()
        .enumerate()
        .map(|(i, (label, bucket))| {
            let average = stats
                .label_averages
                .get(label.as_str())
                .cloned()
                .unwrap_or_default();
            let mut cells = vec![Cell::from(label.as_str())];
            cells.extend(amount_cells(bucket));
            cells.push(Cell::from(average));

            let style = if *label == stats.highest_expense_label {
                theme.table_total
            } else {
                theme.row_style(i)
            };
            Row::new(cells).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(KEY_WIDTH),
        Constraint::Length(AMOUNT_WIDTH),
        Constraint::Length(AMOUNT_WIDTH),
        Constraint::Length(AMOUNT_WIDTH),
        Constraint::Length(AMOUNT_WIDTH),
    ];

    Table::new(rows, widths)
        .header(header_row(&["Label", "Sum", "Max", "Min", "Average"], theme))
        .block(titled_block(" Label-wise Statistics "))
        .style(theme.text)
}

fn growth_table<'a>(stats: &'a StatisticsResult, theme: &'a Theme) -> Table<'a> {
    let rows: Vec<Row> = stats
        .monthly_growth
        .iter()
        .enumerate()
        .map(|(i, (month, growth))| {
            Row::new(vec![
                Cell::from(month.to_string()),
                Cell::from(GrowthIndicator::new(*growth, theme).to_span()),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let widths = [Constraint::Length(KEY_WIDTH), Constraint::Length(14)];

    Table::new(rows, widths)
        .header(header_row(&["Month", "Growth (%)"], theme))
        .block(titled_block(" Monthly Expense Growth (%) "))
        .style(theme.text)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
