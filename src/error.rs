//! Error types for loading the dataset and reading configuration.

use thiserror::Error;

/// The dataset could not be loaded. Fatal for the session: nothing is
/// rendered from a partial table.
#[derive(Debug, Error)]
pub enum DataUnavailable {
    #[error("invalid dataset URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("'{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("payload is not a readable CSV table: {0}")]
    Csv(#[from] csv::Error),

    #[error("payload is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Invalid value in the environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got '{value}'")]
    InvalidPort { name: &'static str, value: String },
}
