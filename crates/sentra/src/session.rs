use std::io;
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use sentra_fetch::DownloadOptions;
use sentra_monitor::{DEFAULT_POLL_INTERVAL, MonitorReport, TransferMonitor};
use sentra_source::SourceRouter;
use sentra_validate::validate_archive;

use crate::error::SessionError;
use crate::request::{PayloadKind, TransferRequest};
use crate::status::TransferStatus;

/// Runs one transfer end to end.
///
/// `execute` performs the idempotency check, routes the request to a
/// configured provider, streams the bytes with a [`TransferMonitor`]
/// sampling alongside, validates the artifact, and converts every outcome
/// into a [`TransferStatus`]. The monitor's lifetime is strictly nested
/// inside the download's: it starts when the write begins and is joined
/// exactly once after the byte stream completes or fails.
pub struct TransferSession {
    router: SourceRouter,
    monitor_interval: Duration,
    request_timeout: Option<Duration>,
}

impl TransferSession {
    pub fn new(router: SourceRouter) -> Self {
        Self {
            router,
            monitor_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
        }
    }

    /// How often the monitor samples the growing file.
    #[must_use]
    pub fn monitor_interval(mut self, interval: Duration) -> Self {
        self.monitor_interval = interval;
        self
    }

    /// Ceiling on each HTTP request made by this session. Without one,
    /// the payload-kind default applies (an hour for archives, a minute
    /// for previews).
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Execute one request. Never panics and never returns an error; every
    /// failure is folded into the returned status.
    pub async fn execute(&self, request: &TransferRequest) -> TransferStatus {
        self.execute_with_report(request).await.0
    }

    /// Like [`TransferSession::execute`], but also hands back the
    /// monitor's diagnostics. `None` when the transfer was skipped or
    /// failed before the byte stream started.
    pub async fn execute_with_report(
        &self,
        request: &TransferRequest,
    ) -> (TransferStatus, Option<MonitorReport>) {
        match self.run(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    product = %request.product().name,
                    error = %e,
                    "transfer failed"
                );
                (
                    TransferStatus::failure(e.reason(), Some(e.to_string())),
                    None,
                )
            }
        }
    }

    async fn run(
        &self,
        request: &TransferRequest,
    ) -> Result<(TransferStatus, Option<MonitorReport>), SessionError> {
        request.check()?;

        let target = request.target_path();
        if is_present(&target).await {
            info!(path = %target.display(), "artifact already present, skipping download");
            return Ok((TransferStatus::AlreadyExists(target), None));
        }

        let endpoint = self.router.resolve(request.source_preference())?;
        let options = self.download_options(request);

        info!(
            product = %request.product().name,
            provider = endpoint.name(),
            path = %target.display(),
            "starting transfer"
        );

        let monitor = TransferMonitor::with_interval(&target, self.monitor_interval);
        let fetched = match request.payload() {
            PayloadKind::Archive => {
                self.router
                    .fetch(endpoint, request.product(), &target, &options)
                    .await
            }
            PayloadKind::Preview => {
                self.router
                    .fetch_preview(endpoint, request.product(), &target, &options)
                    .await
            }
        };
        let report = monitor.finish().await;

        if let Err(e) = fetched {
            // The downloader leaves partial bytes in place; remove them
            // here so the next request for this product downloads instead
            // of idempotently skipping a truncated artifact.
            remove_artifact(&target).await?;
            return Err(e.into());
        }

        if request.payload() == PayloadKind::Archive {
            let verdict = validate_archive(&target)?;
            if !verdict.is_valid {
                remove_artifact(&target).await?;
                warn!(
                    product = %request.product().name,
                    reason = %verdict.reason,
                    "rejected downloaded artifact"
                );
                return Ok((
                    TransferStatus::failure(verdict.reason, None),
                    Some(report),
                ));
            }
        }

        Ok((TransferStatus::Success(target), Some(report)))
    }

    fn download_options(&self, request: &TransferRequest) -> DownloadOptions {
        let mut options = match request.payload() {
            PayloadKind::Archive => DownloadOptions::default(),
            PayloadKind::Preview => DownloadOptions::preview(),
        };
        if let Some(timeout) = self.request_timeout {
            options = options.request_timeout(timeout);
        }
        if let Some(chunk_size) = request.chunk_override() {
            options = options.chunk_size(chunk_size);
        }
        options
    }
}

/// The idempotency check: a non-empty regular file at the target path
/// counts as already transferred.
async fn is_present(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(_) => false,
    }
}

/// Remove a rejected artifact. The validator may already have deleted it,
/// so a missing file is fine.
async fn remove_artifact(path: &Path) -> Result<(), SessionError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SessionError::Validate(
            sentra_validate::ValidateError::Cleanup {
                path: path.to_path_buf(),
                source,
            },
        )),
    }
}
