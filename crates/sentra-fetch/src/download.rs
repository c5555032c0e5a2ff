use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::auth::Credentials;
use crate::error::FetchError;
use crate::options::DownloadOptions;
use crate::progress::ChunkProgress;

/// Outcome of a completed streaming download.
#[derive(Debug)]
pub struct Downloaded {
    /// Where the bytes landed.
    pub path: PathBuf,

    /// Bytes written to disk.
    pub bytes_written: u64,

    /// Content-Length advertised by the server, if any.
    pub total_bytes: Option<u64>,

    /// Wall-clock duration of the transfer.
    pub elapsed: Duration,
}

/// Streams one remote resource to a local file.
///
/// The response body is consumed incrementally and appended to the
/// destination in `chunk_size` writes; it is never held in memory in full.
/// Non-2xx responses are surfaced as [`FetchError::Status`] before any
/// file is created.
#[derive(Debug, Clone)]
pub struct StreamingDownloader {
    client: reqwest::Client,
}

impl StreamingDownloader {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxy settings, custom TLS, tests).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Follow redirects on `url` without authenticating and return the
    /// final location.
    ///
    /// Signed-redirect providers advertise a stable URL that bounces to a
    /// per-request data URL; the data URL is the one that accepts Basic
    /// auth. The response body is dropped unread.
    pub async fn resolve_redirect(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        let parsed = parse_url(url)?;
        let response = self
            .client
            .get(parsed)
            .timeout(timeout)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;
        let resolved = response.url().to_string();
        debug!(url, resolved, "resolved redirect chain");
        Ok(resolved)
    }

    /// Stream `url` into `destination`.
    ///
    /// On any error after the body started arriving, the partial file is
    /// left in place for the caller to inspect or invalidate.
    pub async fn stream(
        &self,
        url: &str,
        destination: &Path,
        credentials: Option<&Credentials>,
        options: &DownloadOptions,
    ) -> Result<Downloaded, FetchError> {
        let started = Instant::now();
        let parsed = parse_url(url)?;

        let mut request = self.client.get(parsed).timeout(options.request_timeout);
        if let Some(creds) = credentials {
            request = request.basic_auth(creds.username(), Some(creds.password()));
        }

        let response = request.send().await.map_err(FetchError::from_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();
        debug!(url, total = ?total_bytes, "starting streamed download");

        let transfer = write_body(response, destination, total_bytes, options);
        let bytes_written = match options.overall_deadline {
            Some(deadline) => tokio::time::timeout(deadline, transfer)
                .await
                .map_err(|_| FetchError::DeadlineExceeded(deadline))??,
            None => transfer.await?,
        };

        let elapsed = started.elapsed();
        info!(
            path = %destination.display(),
            bytes_written,
            elapsed_secs = elapsed.as_secs_f64(),
            "download complete"
        );

        Ok(Downloaded {
            path: destination.to_path_buf(),
            bytes_written,
            total_bytes,
            elapsed,
        })
    }
}

fn parse_url(url: &str) -> Result<reqwest::Url, FetchError> {
    reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))
}

async fn write_body(
    response: reqwest::Response,
    destination: &Path,
    total_bytes: Option<u64>,
    options: &DownloadOptions,
) -> Result<u64, FetchError> {
    let mut stream = response.bytes_stream();
    let mut file = File::create(destination).await?;

    let mut buffer: Vec<u8> = Vec::with_capacity(options.chunk_size);
    let mut written = 0u64;
    let mut last_reported: Option<u64> = None;

    while let Some(next) = stream.next().await {
        let bytes = next.map_err(FetchError::from_reqwest)?;
        buffer.extend_from_slice(&bytes);

        while buffer.len() >= options.chunk_size {
            let rest = buffer.split_off(options.chunk_size);
            file.write_all(&buffer).await?;
            written += buffer.len() as u64;
            buffer = rest;
            report(options, written, total_bytes, &mut last_reported);
        }
    }

    if !buffer.is_empty() {
        file.write_all(&buffer).await?;
        written += buffer.len() as u64;
    }
    file.flush().await?;
    report(options, written, total_bytes, &mut last_reported);

    Ok(written)
}

/// Invoke the progress callback, suppressing repeats within the same
/// whole percentage point. With an unknown total there is no percentage
/// to throttle on, so every chunk write reports.
fn report(
    options: &DownloadOptions,
    bytes_so_far: u64,
    total_bytes: Option<u64>,
    last_reported: &mut Option<u64>,
) {
    let Some(callback) = &options.on_progress else {
        return;
    };
    let progress = ChunkProgress::new(bytes_so_far, total_bytes);
    match progress.percent_floor() {
        Some(point) if *last_reported == Some(point) => {}
        Some(point) => {
            callback(&progress);
            *last_reported = Some(point);
        }
        None => callback(&progress),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_options(calls: Arc<AtomicUsize>) -> DownloadOptions {
        DownloadOptions::default().on_progress(Arc::new(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[test]
    fn report_throttles_within_same_percent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let options = counting_options(calls.clone());
        let mut last = None;

        // 1000 bytes of 1 MB: still 0%, reported once.
        report(&options, 1_000, Some(1_000_000), &mut last);
        report(&options, 2_000, Some(1_000_000), &mut last);
        report(&options, 9_000, Some(1_000_000), &mut last);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Crossing into 1% reports again.
        report(&options, 10_000, Some(1_000_000), &mut last);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn report_every_chunk_when_total_unknown() {
        let calls = Arc::new(AtomicUsize::new(0));
        let options = counting_options(calls.clone());
        let mut last = None;

        report(&options, 1_000, None, &mut last);
        report(&options, 2_000, None, &mut last);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn report_without_callback_is_noop() {
        let mut last = None;
        report(&DownloadOptions::default(), 1_000, Some(2_000), &mut last);
        assert_eq!(last, None);
    }
}
