//! Shared foundation for the expense statistics workspace.
//!
//! Holds the domain models produced by the parser and aggregator, the common
//! error type, number formatting used by every renderer, and the command-line
//! settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
