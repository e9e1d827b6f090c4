use ratatui::text::{Line, Span};

use expense_core::formatting;

use crate::themes::Theme;

// ── GrowthIndicator ──────────────────────────────────────────────────────────

/// Month-over-month growth with a direction arrow.
pub struct GrowthIndicator<'a> {
    /// Percentage change, `None` when the previous month summed to zero.
    pub growth: Option<f64>,
    pub theme: &'a Theme,
}

impl<'a> GrowthIndicator<'a> {
    pub fn new(growth: Option<f64>, theme: &'a Theme) -> Self {
        Self { growth, theme }
    }

    /// Direction arrow for the current growth value.
    pub fn arrow(&self) -> &'static str {
        match self.growth {
            Some(pct) if pct > 0.0 => "▲",
            Some(pct) if pct < 0.0 => "▼",
            Some(_) => "=",
            None => "·",
        }
    }

    /// Format: `"▲ 50.00%"`, or `"· n/a"` when undefined.
    pub fn to_span(&self) -> Span<'a> {
        Span::styled(
            format!("{} {}", self.arrow(), formatting::format_percentage(self.growth)),
            self.theme.growth_style(self.growth),
        )
    }
}

// ── SummaryIndicator ─────────────────────────────────────────────────────────

/// One-line summary of total, average and top label.
pub struct SummaryIndicator<'a> {
    pub total: f64,
    pub average: &'a str,
    pub highest_label: &'a str,
    pub theme: &'a Theme,
}

impl<'a> SummaryIndicator<'a> {
    pub fn new(total: f64, average: &'a str, highest_label: &'a str, theme: &'a Theme) -> Self {
        Self {
            total,
            average,
            highest_label,
            theme,
        }
    }

    /// Render the indicator as a [`Line`].
    ///
    /// Format: `"Total: 1,234.5  Average: 61.73  Top label: Rent"`
    pub fn to_line(&self) -> Line<'a> {
        let top = if self.highest_label.is_empty() {
            Span::styled("none", self.theme.dim)
        } else {
            Span::styled(self.highest_label.to_string(), self.theme.value)
        };

        Line::from(vec![
            Span::styled("Total: ", self.theme.label),
            Span::styled(grouped_amount(self.total), self.theme.value),
            Span::styled("  Average: ", self.theme.label),
            Span::styled(self.average.to_string(), self.theme.value),
            Span::styled("  Top label: ", self.theme.label),
            top,
        ])
    }
}

/// Thousands-grouped amount with trailing zeros trimmed.
fn grouped_amount(value: f64) -> String {
    formatting::format_number(value, 2)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
