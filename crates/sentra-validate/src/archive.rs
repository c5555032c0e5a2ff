use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::ValidateError;
use crate::report::ValidationReport;

/// Check that a downloaded archive is structurally sound.
///
/// The central directory must parse and each entry header must be
/// openable. On structural corruption the file is removed before the
/// invalid report is returned, so the next request for the same product
/// re-downloads instead of idempotently skipping a broken artifact.
///
/// I/O failures (disk errors, the archive missing entirely) are not
/// corruption verdicts and are returned as [`ValidateError`].
pub fn validate_archive(path: &Path) -> Result<ValidationReport, ValidateError> {
    let file = fs::File::open(path)?;

    let mut archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(ZipError::Io(e)) => return Err(e.into()),
        Err(cause) => return reject_corrupt(path, &cause),
    };

    for index in 0..archive.len() {
        match archive.by_index(index) {
            Ok(entry) => debug!(name = entry.name(), "archive entry ok"),
            Err(ZipError::Io(e)) => return Err(e.into()),
            Err(cause) => return reject_corrupt(path, &cause),
        }
    }

    Ok(ValidationReport::valid())
}

fn reject_corrupt(
    path: &Path,
    cause: &dyn std::error::Error,
) -> Result<ValidationReport, ValidateError> {
    warn!(path = %path.display(), %cause, "corrupt archive, removing");
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ValidateError::Cleanup {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    Ok(ValidationReport::invalid("corrupt archive"))
}
