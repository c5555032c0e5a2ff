use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome of one transfer request.
///
/// Produced exactly once per request and handed back to the caller, which
/// decides the downstream action: skip, enqueue correction, or log and
/// abandon. This is the whole contract; no error type crosses the session
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStatus {
    /// The payload was downloaded and validated.
    Success(PathBuf),

    /// A non-empty file already sat at the target path; the network was
    /// never contacted.
    AlreadyExists(PathBuf),

    /// The transfer failed. `reason` is a stable label callers can match
    /// on; `detail` carries the underlying diagnostic when there is one.
    Failure {
        reason: String,
        detail: Option<String>,
    },
}

impl TransferStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferStatus::Success(_))
    }

    /// The artifact on disk, for the outcomes that produced or found one.
    pub fn payload(&self) -> Option<&Path> {
        match self {
            TransferStatus::Success(path) | TransferStatus::AlreadyExists(path) => Some(path),
            TransferStatus::Failure { .. } => None,
        }
    }

    pub(crate) fn failure(reason: impl Into<String>, detail: Option<String>) -> Self {
        TransferStatus::Failure {
            reason: reason.into(),
            detail,
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStatus::Success(path) => write!(f, "success: {}", path.display()),
            TransferStatus::AlreadyExists(path) => {
                write!(f, "already exists: {}", path.display())
            }
            TransferStatus::Failure {
                reason,
                detail: Some(detail),
            } => write!(f, "failed: {reason} ({detail})"),
            TransferStatus::Failure { reason, .. } => write!(f, "failed: {reason}"),
        }
    }
}
