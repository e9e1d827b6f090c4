//! Terminal and report rendering for expense statistics.
//!
//! Provides themes, header and indicator components, the ratatui table view,
//! plain-text and HTML reports, and the interactive editor application built
//! on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod html_report;
pub mod table_view;
pub mod text_report;
pub mod themes;

pub use expense_core as core;
