use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Report header rendering four lines:
///
/// 1. Application title with sparkle decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Record count and month ordering in `[ N records | ordering ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Number of records the parser found.
    pub records: usize,
    /// Month ordering name (e.g. "chronological").
    pub ordering: &'a str,
    /// Theme providing colour styles for each part of the header.
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(records: usize, ordering: &'a str, theme: &'a Theme) -> Self {
        Self {
            records,
            ordering,
            theme,
        }
    }

    /// Render the header as exactly four lines:
    ///
    /// 1. `"✦ ✧ ✦ ✧ EXPENSE STATISTICS ✦ ✧ ✦ ✧"`
    /// 2. `"============================================================"`
    /// 3. `"[ 4 records | chronological ]"`
    /// 4. `""`
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let noun = if self.records == 1 { "record" } else { "records" };

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" EXPENSE STATISTICS ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(format!("{} {noun}", self.records), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.ordering.to_lowercase(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
