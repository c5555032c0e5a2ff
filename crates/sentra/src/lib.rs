//! Resilient satellite product transfers.
//!
//! Remote-sensing products are large (hundreds of MB to several GB), hosted
//! by providers with different URL shapes and authentication schemes, and
//! downloaded over links that fail mid-transfer. This crate ties the
//! per-concern crates together into one reliable operation:
//!
//! 1. [`TransferRequest`] names a product and a destination directory.
//! 2. [`TransferSession::execute`] checks for an existing artifact, routes
//!    the request to a configured provider, streams the bytes to disk while
//!    a [`TransferMonitor`] samples progress alongside, and validates the
//!    result.
//! 3. The caller gets back exactly one [`TransferStatus`]; errors never
//!    escape the session boundary.
//!
//! ```no_run
//! use std::path::Path;
//! use sentra::{ProductRecord, TransferConfig, TransferRequest, TransferSession};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TransferConfig::from_file(Path::new("config.json"))?;
//! let session = TransferSession::new(config.s2_router()?);
//!
//! let product = ProductRecord::new(
//!     "2b17b57d-fff4-4645-b539-91f305c27c69",
//!     "S2B_MSIL1C_20190628T182929_N0207_R027_T12UUA_20190628T221748",
//!     "S2MSI1C",
//! );
//! let request = TransferRequest::new(product, "/data/products");
//! let status = session.execute(&request).await;
//! println!("{status}");
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod request;
mod session;
mod status;

pub use config::{ConfigError, S1Source, TransferConfig};
pub use error::SessionError;
pub use request::{PayloadKind, TransferRequest};
pub use session::TransferSession;
pub use status::TransferStatus;

pub use sentra_fetch::{Credentials, DownloadOptions, StreamingDownloader};
pub use sentra_monitor::{MonitorReport, ProgressSample, TransferMonitor};
pub use sentra_source::{
    AsfEndpoint, EsaEndpoint, ProductRecord, ProviderEndpoint, ProviderKind, SourcePreference,
    SourceRouter,
};
pub use sentra_validate::{Artifact, ResolutionTier, ValidationReport, validate};
