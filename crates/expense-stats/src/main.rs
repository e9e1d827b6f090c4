mod bootstrap;

use anyhow::Result;
use expense_core::settings::Settings;
use expense_data::analysis::Analyzer;
use expense_data::reader::{read_input, InputSource};
use expense_ui::app::App;
use expense_ui::{html_report, text_report};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("expense-stats v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Format: {}, Month order: {}, Theme: {}",
        settings.format,
        settings.month_order,
        settings.theme
    );

    let source = InputSource::from_options(settings.text.as_deref(), settings.input.as_deref());

    if settings.is_interactive() {
        // The editor owns the terminal, so only explicit text or a file is
        // preloaded; stdin is never read here.
        let initial_text = match source {
            InputSource::Stdin => None,
            other => Some(read_input(&other)?),
        };
        let app = App::new(&settings.theme, settings.month_order, initial_text);
        app.run()?;
        return Ok(());
    }

    let text = read_input(&source)?;
    let result = Analyzer::new(settings.month_order).analyze(&text);

    if result.records.is_empty() {
        tracing::warn!("no expense records found in input");
    }

    let rendered = match settings.format.as_str() {
        "json" => result.to_json_pretty()?,
        "html" => html_report::render_html_report(&result.statistics),
        _ => text_report::render_text_report(&result.statistics),
    };
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }

    Ok(())
}
