use std::path::PathBuf;
use thiserror::Error;

/// All errors produced around the expense statistics pipeline.
///
/// The parse-and-aggregate core itself never fails; these variants cover
/// input acquisition, output and configuration.
#[derive(Error, Debug)]
pub enum ExpenseError {
    /// An input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input text was absent or contained only whitespace.
    #[error("Please enter some data!")]
    EmptyInput,

    /// A statistics result could not be serialised to JSON.
    #[error("Failed to serialise JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the expense crates.
pub type Result<T> = std::result::Result<T, ExpenseError>;
