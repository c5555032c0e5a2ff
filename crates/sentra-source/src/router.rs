use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::info;

use sentra_fetch::{AuthScheme, Downloaded, DownloadOptions, StreamingDownloader};

use crate::endpoint::ProviderEndpoint;
use crate::error::SourceError;
use crate::product::ProductRecord;

/// The ESA catalog caps an account at two concurrent downloads.
pub const ESA_MAX_CONCURRENT: usize = 2;

/// Which configured provider a request wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcePreference {
    #[default]
    Primary,
    Secondary,
}

/// Routes one request to one configured provider.
///
/// The primary/secondary assignment is static per deployment. `resolve`
/// picks an endpoint once from the request's preference label and `fetch`
/// runs the transfer against it; a failure on one provider is reported,
/// not silently retried on the other.
#[derive(Debug)]
pub struct SourceRouter {
    primary: ProviderEndpoint,
    secondary: Option<ProviderEndpoint>,
    downloader: StreamingDownloader,
    permits: Option<Arc<Semaphore>>,
}

impl SourceRouter {
    /// Build a router over the configured endpoints.
    ///
    /// Concurrent fetches through this router are capped at
    /// [`ESA_MAX_CONCURRENT`] by default; see [`SourceRouter::max_concurrent`].
    pub fn new(
        primary: ProviderEndpoint,
        secondary: Option<ProviderEndpoint>,
    ) -> Result<Self, SourceError> {
        let downloader = StreamingDownloader::new().map_err(SourceError::Transport)?;
        Ok(Self {
            primary,
            secondary,
            downloader,
            permits: Some(Arc::new(Semaphore::new(ESA_MAX_CONCURRENT))),
        })
    }

    /// Override the concurrency cap; `None` removes it entirely for
    /// callers that coordinate their own limit.
    #[must_use]
    pub fn max_concurrent(mut self, limit: Option<usize>) -> Self {
        self.permits = limit.map(|n| Arc::new(Semaphore::new(n.max(1))));
        self
    }

    /// Swap in a preconfigured downloader (custom client, tests).
    #[must_use]
    pub fn with_downloader(mut self, downloader: StreamingDownloader) -> Self {
        self.downloader = downloader;
        self
    }

    /// Pick the endpoint for a preference label. Selection happens once
    /// per request; there is no failover to the other endpoint.
    pub fn resolve(&self, preference: SourcePreference) -> Result<&ProviderEndpoint, SourceError> {
        match preference {
            SourcePreference::Primary => Ok(&self.primary),
            SourcePreference::Secondary => self.secondary.as_ref().ok_or(SourceError::NoSecondary),
        }
    }

    /// Stream the full product archive from `endpoint` to `destination`.
    pub async fn fetch(
        &self,
        endpoint: &ProviderEndpoint,
        record: &ProductRecord,
        destination: &Path,
        options: &DownloadOptions,
    ) -> Result<Downloaded, SourceError> {
        let url = endpoint.download_url(record)?;
        self.fetch_url(endpoint, url, destination, options).await
    }

    /// Stream the product's preview image from `endpoint` to `destination`.
    pub async fn fetch_preview(
        &self,
        endpoint: &ProviderEndpoint,
        record: &ProductRecord,
        destination: &Path,
        options: &DownloadOptions,
    ) -> Result<Downloaded, SourceError> {
        let url = endpoint.preview_url(record)?;
        self.fetch_url(endpoint, url, destination, options).await
    }

    async fn fetch_url(
        &self,
        endpoint: &ProviderEndpoint,
        url: String,
        destination: &Path,
        options: &DownloadOptions,
    ) -> Result<Downloaded, SourceError> {
        let _permit = match &self.permits {
            // The semaphore is never closed, so acquire cannot fail.
            Some(permits) => permits.acquire().await.ok(),
            None => None,
        };

        info!(provider = endpoint.name(), url, "fetching");

        let url = match endpoint.auth_scheme() {
            AuthScheme::Basic => url,
            AuthScheme::SignedRedirect => self
                .downloader
                .resolve_redirect(&url, options.request_timeout)
                .await
                .map_err(SourceError::classify)?,
        };

        self.downloader
            .stream(&url, destination, Some(endpoint.credentials()), options)
            .await
            .map_err(SourceError::classify)
    }
}
