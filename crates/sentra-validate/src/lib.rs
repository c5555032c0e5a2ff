//! Integrity validation for downloaded and processed imagery products.
//!
//! Two artifact kinds are understood:
//!
//! - **Archives**: the zip central directory must parse and every entry
//!   must be openable. A structurally corrupt archive is deleted, because
//!   leaving it at its well-known path would satisfy the idempotent-skip
//!   check forever and block all future re-download attempts.
//! - **Corrected granules**: each resolution tier directory must hold its
//!   fixed band-file count, and each band file must look like an image a
//!   raster reader could open.
//!
//! Apart from the corrupt-archive deletion, validation never mutates what
//! it inspects.

mod archive;
mod error;
mod raster;
mod report;

use std::path::Path;

pub use archive::validate_archive;
pub use error::ValidateError;
pub use raster::validate_granule;
pub use report::{BandDeficit, ResolutionTier, ValidationReport};

/// An artifact to validate, selected by kind.
#[derive(Debug, Clone, Copy)]
pub enum Artifact<'a> {
    /// A downloaded product archive on disk.
    Archive(&'a Path),

    /// An extracted, atmospherically corrected product directory, checked
    /// at the given correction resolution.
    Granule {
        root: &'a Path,
        correction: ResolutionTier,
    },
}

/// Validate an artifact, dispatching on its kind.
pub fn validate(artifact: Artifact<'_>) -> Result<ValidationReport, ValidateError> {
    match artifact {
        Artifact::Archive(path) => validate_archive(path),
        Artifact::Granule { root, correction } => validate_granule(root, correction),
    }
}
