//! Interactive application state and TUI event loop.
//!
//! [`App`] owns the theme, the text being edited, and the last analysis
//! result. Nothing is parsed until the user asks for it with `Ctrl+Enter`
//! (or `Ctrl+R`, for terminals that cannot report a modified Enter).

use std::io;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

use expense_core::error::{ExpenseError, Result};
use expense_core::models::MonthOrdering;
use expense_data::analysis::{AnalysisResult, Analyzer};

use crate::components::header::Header;
use crate::table_view;
use crate::themes::Theme;

const TICK_RATE: Duration = Duration::from_millis(250);
const EDITOR_TITLE: &str = " Expenses (Ctrl+Enter / Ctrl+R analyze, Ctrl+L clear, Esc quit) ";

// ── Status ────────────────────────────────────────────────────────────────────

/// Message shown on the bottom line after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Warning(String),
}

impl Status {
    pub fn message(&self) -> &str {
        match self {
            Status::Info(message) | Status::Warning(message) => message,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the interactive view.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Raw text in the editor pane.
    pub input: String,
    /// Month ordering the analyzer was built with.
    pub month_ordering: MonthOrdering,
    /// Reusable parse-and-aggregate pipeline.
    pub analyzer: Analyzer,
    /// Most recent result, `None` until the first successful analysis.
    pub last_result: Option<AnalysisResult>,
    /// One-line message shown under the statistics.
    pub status: Option<Status>,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Construct a new application. A non-blank `initial_text` is analyzed
    /// right away so the first frame already shows its statistics.
    pub fn new(
        theme_name: &str,
        month_ordering: MonthOrdering,
        initial_text: Option<String>,
    ) -> Self {
        let mut app = Self {
            theme: Theme::from_name(theme_name),
            input: initial_text.unwrap_or_default(),
            month_ordering,
            analyzer: Analyzer::new(month_ordering),
            last_result: None,
            status: None,
            should_quit: false,
        };
        if !app.input.trim().is_empty() {
            app.analyze();
        }
        app
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive TUI until the user quits.
    pub fn run(self) -> Result<()> {
        self.run_terminal()
            .map_err(|e| ExpenseError::Terminal(e.to_string()))
    }

    /// Uses `crossterm::event::poll` with a short timeout so the loop keeps
    /// redrawing on the current thread.
    fn run_terminal(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = loop {
            if let Err(err) = terminal.draw(|frame| self.render(frame)) {
                break Err(err);
            }

            match event::poll(TICK_RATE) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(Event::Paste(text)) => self.handle_paste(&text),
                    Ok(_) => {}
                    Err(err) => break Err(err),
                },
                Ok(false) => {}
                Err(err) => break Err(err),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    // ── Input handling ────────────────────────────────────────────────────────

    /// Apply one key press to the editor.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Enter if ctrl => self.analyze(),
            KeyCode::Char('r') if ctrl => self.analyze(),
            KeyCode::Char('l') if ctrl => self.clear(),
            KeyCode::Enter => self.input.push('\n'),
            KeyCode::Tab => self.input.push('\t'),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !ctrl && !alt => self.input.push(c),
            _ => {}
        }
    }

    /// Insert pasted text, normalising Windows line endings.
    pub fn handle_paste(&mut self, text: &str) {
        self.input.push_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
    }

    /// Run one parse-and-aggregate pass over the editor contents.
    ///
    /// Blank input leaves the previous result in place and sets a warning.
    pub fn analyze(&mut self) {
        if self.input.trim().is_empty() {
            warn!("analysis requested with blank input");
            self.status = Some(Status::Warning(ExpenseError::EmptyInput.to_string()));
            return;
        }

        let result = self.analyzer.analyze(&self.input);
        let count = result.metadata.records_parsed;
        debug!(records = count, "interactive analysis");
        self.status = Some(match count {
            0 => Status::Warning("No expense records found".to_string()),
            1 => Status::Info("Parsed 1 record".to_string()),
            n => Status::Info(format!("Parsed {n} records")),
        });
        self.last_result = Some(result);
    }

    /// Empty the editor and forget the last result.
    pub fn clear(&mut self) {
        self.input.clear();
        self.last_result = None;
        self.status = None;
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [header_area, editor_area, stats_area, status_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Percentage(30),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let records = self
            .last_result
            .as_ref()
            .map_or(0, |r| r.metadata.records_parsed);
        let header = Header::new(records, self.month_ordering.as_str(), &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

        self.render_editor(frame, editor_area);

        match &self.last_result {
            Some(result) if !result.records.is_empty() => {
                table_view::render_statistics(frame, stats_area, &result.statistics, &self.theme)
            }
            Some(_) => table_view::render_no_data(frame, stats_area, &self.theme),
            None => {
                let hint = Paragraph::new(Line::from(Span::styled(
                    "Enter expenses like 12.50 - Food (01/02/21), then press Ctrl+Enter.",
                    self.theme.dim,
                )))
                .block(Block::default().borders(Borders::ALL).title(" Statistics "));
                frame.render_widget(hint, stats_area);
            }
        }

        let status = match &self.status {
            Some(Status::Info(message)) => Span::styled(message.clone(), self.theme.info),
            Some(Status::Warning(message)) => Span::styled(message.clone(), self.theme.warning),
            None => Span::styled("Esc or Ctrl+C to quit", self.theme.dim),
        };
        frame.render_widget(Paragraph::new(Line::from(status)), status_area);
    }

    /// Draw the editor, scrolled so the last line stays visible, and place
    /// the cursor after the final character.
    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let inner_height = area.height.saturating_sub(2);
        let lines: Vec<&str> = self.input.split('\n').collect();
        let line_count = lines.len() as u16;
        let scroll = line_count.saturating_sub(inner_height);

        let editor = Paragraph::new(self.input.as_str())
            .style(self.theme.editor_text)
            .scroll((scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.editor_border)
                    .title(EDITOR_TITLE),
            );
        frame.render_widget(editor, area);

        if inner_height == 0 || area.width < 2 {
            return;
        }
        let last = lines.last().copied().unwrap_or_default();
        let max_x = area.x + area.width - 2;
        let x = (area.x + 1).saturating_add(last.width() as u16).min(max_x);
        let y = area.y + 1 + line_count.saturating_sub(1) - scroll;
        frame.set_cursor_position(Position::new(x, y));
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                app.handle_key(key(KeyCode::Enter));
            } else {
                app.handle_key(key(KeyCode::Char(c)));
            }
        }
    }

    fn new_app() -> App {
        App::new("dark", MonthOrdering::Chronological, None)
    }

    // ── App::new ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = new_app();
        assert!(app.input.is_empty());
        assert!(app.last_result.is_none());
        assert!(app.status.is_none());
        assert!(!app.should_quit);
        assert_eq!(app.month_ordering, MonthOrdering::Chronological);
    }

    #[test]
    fn test_app_creation_with_initial_text_analyzes() {
        let app = App::new(
            "light",
            MonthOrdering::Lexicographic,
            Some("5 - Tea (02/02/22)".to_string()),
        );
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.metadata.month_ordering, MonthOrdering::Lexicographic);
    }

    #[test]
    fn test_app_creation_unknown_theme_falls_back() {
        let app = App::new("neon", MonthOrdering::Chronological, Some("   ".to_string()));
        assert!(app.last_result.is_none());
    }

    // ── Editing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_typing_and_newlines() {
        let mut app = new_app();
        type_text(&mut app, "12 - Food (01/02/21)\n3 - Bus (02/02/21)");
        assert_eq!(app.input, "12 - Food (01/02/21)\n3 - Bus (02/02/21)");
        // Typing alone never triggers analysis.
        assert!(app.last_result.is_none());
    }

    #[test]
    fn test_shifted_characters_are_inserted() {
        let mut app = new_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('F'), KeyModifiers::SHIFT));
        assert_eq!(app.input, "F");
    }

    #[test]
    fn test_backspace() {
        let mut app = new_app();
        type_text(&mut app, "ab");
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.input, "a");
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.input, "");
    }

    #[test]
    fn test_paste_normalises_line_endings() {
        let mut app = new_app();
        app.handle_paste("1 - A (01/01/21)\r\n2 - B (01/01/21)\r3");
        assert_eq!(app.input, "1 - A (01/01/21)\n2 - B (01/01/21)\n3");
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut app = new_app();
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        app.handle_key(release);
        assert!(app.input.is_empty());
    }

    // ── Analysis trigger ──────────────────────────────────────────────────────

    #[test]
    fn test_ctrl_enter_analyzes() {
        let mut app = new_app();
        type_text(&mut app, "100 - Rent (01/01/21)\n150 - Rent (01/02/21)");
        app.handle_key(ctrl(KeyCode::Enter));

        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.statistics.highest_expense_label, "Rent");
        assert_eq!(app.status.as_ref().map(Status::message), Some("Parsed 2 records"));
        // Ctrl+Enter must not insert a newline.
        assert!(!app.input.ends_with('\n'));
    }

    #[test]
    fn test_ctrl_r_analyzes() {
        let mut app = new_app();
        type_text(&mut app, "7 - Film (03/03/23)");
        app.handle_key(ctrl(KeyCode::Char('r')));
        assert_eq!(app.status.as_ref().map(Status::message), Some("Parsed 1 record"));
        assert_eq!(app.input, "7 - Film (03/03/23)");
    }

    #[test]
    fn test_blank_input_warns_and_keeps_previous_result() {
        let mut app = new_app();
        app.handle_key(ctrl(KeyCode::Enter));
        assert!(app.last_result.is_none());
        assert_eq!(app.status.as_ref().map(Status::message), Some("Please enter some data!"));

        type_text(&mut app, "1 - A (01/01/21)");
        app.handle_key(ctrl(KeyCode::Char('r')));
        app.input = "  \n ".to_string();
        app.handle_key(ctrl(KeyCode::Char('r')));
        assert!(app.last_result.is_some());
        assert_eq!(app.status.as_ref().map(Status::message), Some("Please enter some data!"));
    }

    #[test]
    fn test_no_records_status() {
        let mut app = new_app();
        type_text(&mut app, "not a valid expense");
        app.handle_key(ctrl(KeyCode::Enter));
        assert!(app.last_result.as_ref().unwrap().records.is_empty());
        assert_eq!(app.status.as_ref().map(Status::message), Some("No expense records found"));
    }

    #[test]
    fn test_ctrl_l_clears() {
        let mut app = new_app();
        type_text(&mut app, "1 - A (01/01/21)");
        app.handle_key(ctrl(KeyCode::Enter));
        app.handle_key(ctrl(KeyCode::Char('l')));
        assert!(app.input.is_empty());
        assert!(app.last_result.is_none());
        assert!(app.status.is_none());
    }

    // ── Quit ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_esc_quits() {
        let mut app = new_app();
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_plain_c_types() {
        let mut app = new_app();
        app.handle_key(key(KeyCode::Char('c')));
        assert!(!app.should_quit);
        assert_eq!(app.input, "c");
        app.handle_key(ctrl(KeyCode::Char('c')));
        assert!(app.should_quit);
    }

    // ── Render (does not panic) ───────────────────────────────────────────────

    #[test]
    fn test_render_each_state_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let mut app = new_app();

        terminal.draw(|frame| app.render(frame)).unwrap();

        type_text(&mut app, "junk");
        app.handle_key(ctrl(KeyCode::Enter));
        terminal.draw(|frame| app.render(frame)).unwrap();

        app.clear();
        type_text(&mut app, &"1 - A (01/01/21)\n".repeat(50));
        app.handle_key(ctrl(KeyCode::Enter));
        terminal.draw(|frame| app.render(frame)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("EXPENSE STATISTICS"));
        assert!(screen.contains("50 records"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(8, 5)).unwrap();
        let app = App::new("dark", MonthOrdering::Chronological, Some("1 - A (01/01/21)".into()));
        terminal.draw(|frame| app.render(frame)).unwrap();
    }
}
