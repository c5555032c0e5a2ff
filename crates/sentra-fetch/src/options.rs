use std::fmt;
use std::time::Duration;

use crate::progress::ProgressFn;

/// Default write chunk size for full product archives (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Smaller chunk size suited to preview/quicklook images (64 KiB).
pub const PREVIEW_CHUNK_SIZE: usize = 64 * 1024;

/// Default per-request timeout.
///
/// Provider endpoints in production use ceilings between 60 s and 7200 s;
/// one hour is the value used for full product transfers.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Configuration for one streaming download.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sentra_fetch::DownloadOptions;
///
/// let options = DownloadOptions::default()
///     .chunk_size(256 * 1024)
///     .request_timeout(Duration::from_secs(120));
/// ```
#[derive(Clone)]
pub struct DownloadOptions {
    /// Size of each sequential write to the destination file.
    ///
    /// Default: [`DEFAULT_CHUNK_SIZE`] (1 MiB)
    pub chunk_size: usize,

    /// Ceiling on the whole HTTP request, from connect to last body byte.
    ///
    /// This bounds the network side only; see `overall_deadline` for a
    /// bound that also covers disk writes.
    ///
    /// Default: [`DEFAULT_REQUEST_TIMEOUT`] (1 hour)
    pub request_timeout: Duration,

    /// Optional deadline on the entire transfer including file writes.
    ///
    /// The request timeout does not cover a stalled disk; setting this
    /// guarantees the download future completes within a bound.
    ///
    /// Default: None
    pub overall_deadline: Option<Duration>,

    /// Progress callback, throttled to ≥1 percentage-point changes when
    /// the total size is known.
    ///
    /// Default: None
    pub on_progress: Option<ProgressFn>,
}

impl fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("chunk_size", &self.chunk_size)
            .field("request_timeout", &self.request_timeout)
            .field("overall_deadline", &self.overall_deadline)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            overall_deadline: None,
            on_progress: None,
        }
    }
}

impl DownloadOptions {
    /// Options tuned for small preview images.
    #[must_use]
    pub fn preview() -> Self {
        Self::default()
            .chunk_size(PREVIEW_CHUNK_SIZE)
            .request_timeout(Duration::from_secs(60))
    }

    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    #[must_use]
    pub fn overall_deadline(mut self, deadline: Duration) -> Self {
        self.overall_deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn on_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }
}
