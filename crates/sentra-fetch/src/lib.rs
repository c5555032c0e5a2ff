//! Chunked streaming HTTP downloads.
//!
//! The downloader streams a response body to disk in fixed-size sequential
//! writes. The body is never buffered in full; memory use is bounded by the
//! configured chunk size. Progress reporting is throttled so the write loop
//! stays cheap.
//!
//! On a mid-stream failure the partially written file is left in place. The
//! caller decides whether a partial artifact is worth keeping; this crate
//! never deletes on its own.

mod auth;
mod download;
mod error;
mod options;
mod progress;

pub use auth::{AuthScheme, Credentials};
pub use download::{Downloaded, StreamingDownloader};
pub use error::FetchError;
pub use options::{
    DEFAULT_CHUNK_SIZE, DEFAULT_REQUEST_TIMEOUT, DownloadOptions, PREVIEW_CHUNK_SIZE,
};
pub use progress::{ChunkProgress, ProgressFn};
