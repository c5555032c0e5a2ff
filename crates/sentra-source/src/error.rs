//! Error types for sentra-source.

use sentra_fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("resource not found")]
    NotFound,

    #[error("authentication rejected")]
    AuthRejected,

    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("transport failure: {0}")]
    Transport(#[source] FetchError),

    #[error("invalid product identifier {0:?}")]
    InvalidProductId(String),

    #[error("invalid product name {name:?}: {reason}")]
    InvalidProductName { name: String, reason: String },

    #[error("product record is missing {0}")]
    MissingAttribute(&'static str),

    #[error("unsupported product type {0:?} for archive download")]
    UnsupportedProductType(String),

    #[error("no secondary provider is configured")]
    NoSecondary,
}

impl SourceError {
    /// Classify a downloader failure, keeping the HTTP status mapping in
    /// one place: 404 means the product is not hosted there, 401/403 mean
    /// the account was refused, anything else non-2xx is unexpected.
    pub(crate) fn classify(e: FetchError) -> Self {
        match e {
            FetchError::Status { code: 404 } => SourceError::NotFound,
            FetchError::Status { code: 401 | 403 } => SourceError::AuthRejected,
            FetchError::Status { code } => SourceError::UnexpectedStatus(code),
            other => SourceError::Transport(other),
        }
    }
}
