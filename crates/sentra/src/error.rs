//! Error types for sentra.
//!
//! Everything that can go wrong inside a session. [`SessionError`] is
//! converted to a [`crate::TransferStatus`] at the `execute` boundary and
//! never reaches the caller directly.

use std::path::PathBuf;

use thiserror::Error;

use sentra_source::SourceError;
use sentra_validate::ValidateError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("destination directory {} does not exist", .0.display())]
    DestinationMissing(PathBuf),

    #[error("product record has an empty name")]
    EmptyProductName,

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Validate(#[from] ValidateError),
}

impl SessionError {
    /// Stable failure label for the status contract.
    ///
    /// HTTP verdicts keep their own labels so callers can distinguish a
    /// missing product from a refused account; everything else groups by
    /// taxonomy: malformed requests, malformed records, configuration
    /// problems, transport faults, validation faults.
    pub(crate) fn reason(&self) -> &'static str {
        match self {
            SessionError::DestinationMissing(_) | SessionError::EmptyProductName => {
                "invalid request"
            }
            SessionError::Source(SourceError::NotFound) => "resource not found",
            SessionError::Source(SourceError::AuthRejected) => "authentication rejected",
            SessionError::Source(SourceError::UnexpectedStatus(_)) => "unexpected status",
            SessionError::Source(SourceError::Transport(_)) => "transfer exception",
            SessionError::Source(
                SourceError::InvalidProductId(_)
                | SourceError::InvalidProductName { .. }
                | SourceError::MissingAttribute(_)
                | SourceError::UnsupportedProductType(_),
            ) => "invalid product record",
            SessionError::Source(SourceError::NoSecondary) => "configuration error",
            SessionError::Validate(_) => "validation error",
        }
    }
}
