use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ExpenseError, Result};
use crate::models::MonthOrdering;

/// Values accepted by `--format`.
pub const FORMATS: [&str; 4] = ["table", "html", "json", "interactive"];
/// The `--format` value that opens the editor. It is never persisted.
pub const INTERACTIVE_FORMAT: &str = "interactive";
/// Values accepted by `--theme`.
pub const THEMES: [&str; 3] = ["light", "dark", "auto"];

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Monthly, yearly and per-label statistics from free-text expense notes
#[derive(Parser, Debug, Clone)]
#[command(
    name = "expense-stats",
    about = "Monthly, yearly and per-label statistics from free-text expense notes",
    version
)]
pub struct Settings {
    /// Expense text given inline, e.g. "12.50 - Food (01/02/21)"
    #[arg(long, conflicts_with = "input")]
    pub text: Option<String>,

    /// Read expense text from a file ("-" for stdin)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", value_parser = FORMATS)]
    pub format: String,

    /// Ordering of month keys for the monthly table and growth
    #[arg(long, value_enum, default_value_t = MonthOrdering::Chronological)]
    pub month_order: MonthOrdering,

    /// Display theme for the interactive view
    #[arg(long, default_value = "auto", value_parser = THEMES)]
    pub theme: String,

    /// Logging level (case-insensitive)
    #[arg(
        long,
        env = "EXPENSE_STATS_LOG_LEVEL",
        default_value = "WARNING",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"],
        ignore_case = true
    )]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Display preferences persisted to `~/.expense-stats/last_used.json`.
///
/// Expense text is never stored.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_order: Option<MonthOrdering>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".expense-stats").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        let parsed = serde_json::from_str::<Self>(&content)
            .map_err(ExpenseError::from)
            .and_then(|params| params.validate().map(|()| params));
        match parsed {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring unreadable last-used config"
                );
                Self::default()
            }
        }
    }

    /// Reject persisted values the command line would not accept.
    pub fn validate(&self) -> Result<()> {
        if let Some(format) = &self.format {
            if !FORMATS.contains(&format.as_str()) {
                return Err(ExpenseError::Config(format!("unknown format {format:?}")));
            }
        }
        if let Some(theme) = &self.theme {
            if !THEMES.contains(&theme.as_str()) {
                return Err(ExpenseError::Config(format!("unknown theme {theme:?}")));
            }
        }
        Ok(())
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::io::Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!(error = %e, "failed to clear last-used config");
            }
            return settings.apply_debug_flag();
        }

        let last = LastUsedParams::load_from(config_path);
        // Older files may still carry the editor format; it would swallow stdin.
        let last_format = last.format.filter(|f| f != INTERACTIVE_FORMAT);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last_format.clone() {
                settings.format = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        // NOTE: clap stores the arg id using the field name (underscores).
        if !is_arg_explicitly_set(&matches, "month_order") {
            if let Some(v) = last.month_order {
                settings.month_order = v;
            }
        }

        settings = settings.apply_debug_flag();

        let mut params = LastUsedParams::from(&settings);
        if settings.is_interactive() {
            params.format = last_format;
        }
        if let Err(e) = params.save_to(config_path) {
            tracing::warn!(error = %e, "failed to persist last-used config");
        }

        settings
    }

    /// `true` when the run should open the interactive editor instead of
    /// printing a report.
    pub fn is_interactive(&self) -> bool {
        self.format == INTERACTIVE_FORMAT
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            format: Some(s.format.clone()),
            theme: Some(s.theme.clone()),
            month_order: Some(s.month_order),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            format: Some("html".to_string()),
            theme: Some("dark".to_string()),
            month_order: Some(MonthOrdering::Lexicographic),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.format, Some("html".to_string()));
        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.month_order, Some(MonthOrdering::Lexicographic));
    }

    #[test]
    fn test_last_used_params_month_order_is_lowercase_on_disk() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams {
            month_order: Some(MonthOrdering::Chronological),
            ..Default::default()
        }
        .save_to(&path)
        .expect("save");

        let raw = std::fs::read_to_string(&path).expect("read");
        assert!(raw.contains("\"chronological\""), "raw = {raw}");
        assert!(!raw.contains("format"), "unset fields are skipped");
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert!(loaded.format.is_none());
        assert!(loaded.theme.is_none());
        assert!(loaded.month_order.is_none());
    }

    #[test]
    fn test_last_used_params_default_when_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let loaded = LastUsedParams::load_from(&path);
        assert!(loaded.format.is_none());
    }

    #[test]
    fn test_last_used_params_default_when_values_unknown() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"format": "pdf", "theme": "dark"}"#).unwrap();

        let loaded = LastUsedParams::load_from(&path);
        assert!(loaded.format.is_none());
        assert!(loaded.theme.is_none());
    }

    #[test]
    fn test_last_used_params_validate() {
        let ok = LastUsedParams {
            format: Some("json".to_string()),
            theme: Some("auto".to_string()),
            month_order: None,
        };
        assert!(ok.validate().is_ok());

        let bad = LastUsedParams {
            theme: Some("neon".to_string()),
            ..Default::default()
        };
        let err = bad.validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: unknown theme \"neon\"");
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        }
        .save_to(&path)
        .expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    // ── CLI parsing ───────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["expense-stats"]);

        assert!(settings.text.is_none());
        assert!(settings.input.is_none());
        assert_eq!(settings.format, "table");
        assert_eq!(settings.month_order, MonthOrdering::Chronological);
        assert_eq!(settings.theme, "auto");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
        assert!(!settings.is_interactive());
    }

    #[test]
    fn test_settings_cli_inline_text() {
        let settings =
            Settings::parse_from(["expense-stats", "--text", "12.50 - Food (01/02/21)"]);
        assert_eq!(settings.text.as_deref(), Some("12.50 - Food (01/02/21)"));
    }

    #[test]
    fn test_settings_text_conflicts_with_input() {
        let result = Settings::try_parse_from([
            "expense-stats",
            "--text",
            "1 - A (01/01/21)",
            "--input",
            "notes.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_month_order() {
        let settings = Settings::parse_from(["expense-stats", "--month-order", "lexicographic"]);
        assert_eq!(settings.month_order, MonthOrdering::Lexicographic);
    }

    #[test]
    fn test_settings_rejects_unknown_format() {
        assert!(Settings::try_parse_from(["expense-stats", "--format", "pdf"]).is_err());
    }

    #[test]
    fn test_settings_log_level_is_case_insensitive() {
        let settings = Settings::parse_from(["expense-stats", "--log-level", "debug"]);
        assert_eq!(settings.log_level.to_uppercase(), "DEBUG");

        let settings = Settings::parse_from(["expense-stats", "--log-level", "Warning"]);
        assert_eq!(settings.log_level.to_uppercase(), "WARNING");

        assert!(Settings::try_parse_from(["expense-stats", "--log-level", "verbose"]).is_err());
    }

    #[test]
    fn test_settings_interactive_format() {
        let settings = Settings::parse_from(["expense-stats", "--format", "interactive"]);
        assert!(settings.is_interactive());
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            format: Some("html".to_string()),
            theme: Some("dark".to_string()),
            month_order: Some(MonthOrdering::Lexicographic),
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["expense-stats".into()], &config_path);
        assert_eq!(settings.format, "html");
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.month_order, MonthOrdering::Lexicographic);
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            format: Some("html".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["expense-stats".into(), "--format".into(), "json".into()],
            &config_path,
        );
        assert_eq!(settings.format, "json");
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["expense-stats".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["expense-stats".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec![
                "expense-stats".into(),
                "--month-order".into(),
                "lexicographic".into(),
            ],
            &config_path,
        );

        assert!(config_path.exists(), "config file must be persisted after run");
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.month_order, Some(MonthOrdering::Lexicographic));
        assert_eq!(loaded.format, Some("table".to_string()));
    }

    #[test]
    fn test_load_with_last_used_never_persists_interactive() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["expense-stats".into(), "--format".into(), "interactive".into()],
            &config_path,
        );
        assert!(settings.is_interactive());

        let raw = std::fs::read_to_string(&config_path).expect("read");
        assert!(!raw.contains("interactive"), "raw = {raw}");

        // A later piped run must print a report, not open the editor.
        let settings =
            Settings::load_with_last_used_impl(vec!["expense-stats".into()], &config_path);
        assert_eq!(settings.format, "table");
        assert!(!settings.is_interactive());
    }

    #[test]
    fn test_load_with_last_used_interactive_keeps_previous_format() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            format: Some("json".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        Settings::load_with_last_used_impl(
            vec!["expense-stats".into(), "--format".into(), "interactive".into()],
            &config_path,
        );

        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.format, Some("json".to_string()));
    }

    #[test]
    fn test_load_with_last_used_ignores_persisted_interactive() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            format: Some("interactive".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["expense-stats".into()], &config_path);
        assert_eq!(settings.format, "table");
    }
}
