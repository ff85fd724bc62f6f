//! Error types for parameter loading and report writing

use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems with a parameter source, raised before any cycle runs
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read parameters file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed parameters: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {line}: expected `keyword value`, found {content:?}")]
    MalformedLine { line: usize, content: String },
    #[error("line {line}: value {value:?} for `{keyword}` is not a number")]
    BadNumber {
        line: usize,
        keyword: String,
        value: String,
    },
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures while writing run reports
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode summary: {0}")]
    Json(#[from] serde_json::Error),
}
