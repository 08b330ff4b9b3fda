use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyserError>;

#[derive(Debug, Error)]
pub enum AnalyserError {
    /// Channel or playlist resolution returned no usable result.
    #[error("feed not found: {0}")]
    FeedNotFound(String),

    /// Transport, HTTP status or payload failure on a call that cannot be defaulted.
    #[error("{source_name} unavailable: {message}")]
    SourceUnavailable { source_name: String, message: String },

    #[error("failed to write report {}: {source}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl AnalyserError {
    pub fn unavailable(source_name: impl Into<String>, message: impl ToString) -> Self {
        AnalyserError::SourceUnavailable {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub fn write_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalyserError::OutputWriteFailure { path: path.into(), source }
    }

    /// Whether the failure ends the whole run rather than a single producer.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AnalyserError::OutputWriteFailure { .. })
    }
}

impl From<reqwest::Error> for AnalyserError {
    fn from(err: reqwest::Error) -> Self {
        let host = err
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("http")
            .to_string();
        AnalyserError::unavailable(host, err)
    }
}
