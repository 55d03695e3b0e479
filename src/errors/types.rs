//! Error type definitions for m3u-merge

use thiserror::Error;

use crate::utils::url::UrlUtils;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem errors while writing the playlist or run log
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while fetching a source playlist
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network connection timeouts
    #[error("Connection timeout: {url}")]
    Timeout { url: String },

    /// Transport-level failures (DNS, refused connection, TLS, ...)
    #[error("Transport error: {url} - {message}")]
    Transport { url: String, message: String },

    /// Non-success HTTP status from the source
    #[error("HTTP error: {status} - {url}")]
    Http { status: u16, url: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Map a reqwest failure onto the source taxonomy, keeping credentials out of the message
    pub fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                message: UrlUtils::obfuscate_credentials(&error.to_string()),
            }
        }
    }
}
