//! Error types for the scavenger-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the scavenger library.
#[derive(Error, Debug)]
pub enum ScavengerError {
    /// The workbook or one of its sheets could not be read.
    #[error("source error: {0}")]
    SourceRead(#[from] SourceReadError),

    /// The label catalog is malformed.
    #[error("catalog error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while opening a workbook or resolving one of its sheets.
#[derive(Error, Debug)]
pub enum SourceReadError {
    /// The file could not be opened or is not a valid spreadsheet container.
    #[error("failed to open {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    /// The file extension is not a known spreadsheet format.
    #[error("unsupported spreadsheet format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The workbook contains no sheets at all.
    #[error("workbook has no sheets")]
    NoSheets,

    /// The selected sheet could not be loaded.
    #[error("failed to read sheet '{sheet}': {reason}")]
    Sheet { sheet: String, reason: String },
}

/// Errors in label catalog authoring.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The same normalized label occurs in two different groups.
    #[error("label '{label}' appears in group {first_group} and group {second_group}")]
    DuplicateLabel {
        label: String,
        first_group: usize,
        second_group: usize,
    },

    /// A label is blank once spaces are removed.
    #[error("group {group} contains a blank label")]
    EmptyLabel { group: usize },

    /// A group lists no labels.
    #[error("group {group} has no labels")]
    EmptyGroup { group: usize },
}

/// Result type for the scavenger library.
pub type Result<T> = std::result::Result<T, ScavengerError>;
