//! Error types for the evcharge-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the evcharge library.
#[derive(Error, Debug)]
pub enum ChargeError {
    /// OCR collaborator error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// CSV store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Plugin registry or dispatch error.
    #[error("plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while running the external OCR binary.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR binary could not be launched.
    #[error("{binary} binary not found; install it (e.g. `brew install tesseract`)")]
    BinaryNotFound { binary: String },

    /// The OCR binary ran but exited unsuccessfully.
    #[error("OCR failed for {}: {stderr}", path.display())]
    Failed { path: PathBuf, stderr: String },

    /// The OCR binary produced output that is not valid UTF-8.
    #[error("OCR output for {} is not valid UTF-8", path.display())]
    InvalidOutput { path: PathBuf },

    /// Launching the process failed for another reason.
    #[error("failed to launch OCR: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Errors related to reading or writing the CSV file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying CSV reader/writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while preparing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV buffer could not be turned back into text.
    #[error("CSV output is not valid UTF-8")]
    Encoding,
}

/// Errors related to plugin registration and lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// A plugin with the same brand is already registered.
    #[error("plugin '{0}' is already registered")]
    DuplicateBrand(String),

    /// No plugin answers to the requested name.
    #[error("unknown plugin '{name}'. Available plugins: {available}")]
    UnknownPlugin { name: String, available: String },
}

/// Result type for the evcharge library.
pub type Result<T> = std::result::Result<T, ChargeError>;
