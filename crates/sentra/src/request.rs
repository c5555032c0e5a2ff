use std::path::{Path, PathBuf};

use sentra_source::{ProductRecord, SourcePreference};

use crate::error::SessionError;

/// What a request wants from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadKind {
    /// The full product archive.
    #[default]
    Archive,

    /// The small quicklook preview image.
    Preview,
}

/// One logical download request.
///
/// Immutable once built; a request owns no resources and lives only for
/// the duration of one [`crate::TransferSession::execute`] call. The file
/// it produces on disk outlives it.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    product: ProductRecord,
    destination: PathBuf,
    payload: PayloadKind,
    preference: SourcePreference,
    chunk_size: Option<usize>,
}

impl TransferRequest {
    /// Request `product`'s archive into the existing directory
    /// `destination`.
    pub fn new(product: ProductRecord, destination: impl Into<PathBuf>) -> Self {
        Self {
            product,
            destination: destination.into(),
            payload: PayloadKind::default(),
            preference: SourcePreference::default(),
            chunk_size: None,
        }
    }

    #[must_use]
    pub fn payload_kind(mut self, payload: PayloadKind) -> Self {
        self.payload = payload;
        self
    }

    #[must_use]
    pub fn preference(mut self, preference: SourcePreference) -> Self {
        self.preference = preference;
        self
    }

    /// Override the write chunk size for this request.
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size.max(1));
        self
    }

    pub fn product(&self) -> &ProductRecord {
        &self.product
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn payload(&self) -> PayloadKind {
        self.payload
    }

    pub fn source_preference(&self) -> SourcePreference {
        self.preference
    }

    pub fn chunk_override(&self) -> Option<usize> {
        self.chunk_size
    }

    /// Where the payload lands. The product name is embedded in the file
    /// name, so concurrent sessions for different products never collide.
    pub fn target_path(&self) -> PathBuf {
        match self.payload {
            PayloadKind::Archive => self.destination.join(format!("{}.zip", self.product.name)),
            PayloadKind::Preview => self
                .destination
                .join(format!("{}_TCI.jp2", self.product.name)),
        }
    }

    /// The invariants a request must satisfy before any work starts.
    pub(crate) fn check(&self) -> Result<(), SessionError> {
        if self.product.name.is_empty() {
            return Err(SessionError::EmptyProductName);
        }
        if !self.destination.is_dir() {
            return Err(SessionError::DestinationMissing(self.destination.clone()));
        }
        Ok(())
    }
}
