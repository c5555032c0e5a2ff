//! Error types for sentra-fetch.

use std::io;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected HTTP status {code}")]
    Status { code: u16 },

    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("transfer deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl FetchError {
    /// Map a `reqwest` failure onto the closed error set.
    ///
    /// Timeouts and connection refusals get their own variants so callers
    /// can distinguish them from generic transport failures.
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e)
        } else {
            FetchError::Transport(e)
        }
    }
}
