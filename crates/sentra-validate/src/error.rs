//! Error types for sentra-validate.
//!
//! Semantic verdicts ("this archive is corrupt") are carried by
//! [`crate::ValidationReport`]; this error covers the cases where the
//! validator itself could not do its job.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("could not remove rejected artifact {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
