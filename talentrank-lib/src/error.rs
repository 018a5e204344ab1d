//! Error types for talentrank

use thiserror::Error;

/// Result type alias for talentrank operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while cleaning, scoring or ranking a dataset
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input provided (empty dataset, empty query, bad connection count, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The pretrained sentence model could not be loaded or was never supplied
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The pretrained sentence model failed while encoding text
    #[error("embedding error: {0}")]
    Embedding(String),

    /// The local word-embedding model could not be trained
    #[error("training error: {0}")]
    Training(String),

    /// Configuration could not be read or is out of range
    #[error("config error: {0}")]
    Config(String),

    /// Reading a dataset or config file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A dataset file was not valid JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A dataset file was not valid CSV
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
