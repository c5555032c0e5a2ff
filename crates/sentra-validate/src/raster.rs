use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ValidateError;
use crate::report::{BandDeficit, ResolutionTier, ValidationReport};

/// JP2 container signature box.
const JP2_SIGNATURE: [u8; 12] = [
    0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20, 0x0D, 0x0A, 0x87, 0x0A,
];

/// Raw JPEG 2000 codestream start-of-codestream marker.
const J2K_CODESTREAM: [u8; 4] = [0xFF, 0x4F, 0xFF, 0x51];

/// Check an atmospherically corrected product directory for completeness.
///
/// A correction can report success and still leave the granule half
/// written, so the band files are counted per resolution tier and each
/// one is probed for a readable image header. The 20 m tier must always
/// be present; 10 m and 60 m are only required when `correction` asks
/// for them, but when present their counts must still be exact.
pub fn validate_granule(
    product_path: &Path,
    correction: ResolutionTier,
) -> Result<ValidationReport, ValidateError> {
    let granule_root = product_path.join("GRANULE");
    if !granule_root.is_dir() {
        return Ok(ValidationReport::invalid("missing GRANULE directory"));
    }

    // Products carry a single granule directory; take the first.
    let Some(granule) = first_subdir(&granule_root)? else {
        return Ok(ValidationReport::invalid("empty GRANULE directory"));
    };
    let img_data = granule.join("IMG_DATA");

    let bands_10m = band_files(&img_data.join(ResolutionTier::R10m.dir_name()))?;
    let bands_20m = band_files(&img_data.join(ResolutionTier::R20m.dir_name()))?;
    let bands_60m = band_files(&img_data.join(ResolutionTier::R60m.dir_name()))?;

    if !bands_10m.is_empty() {
        if let Some(report) = count_mismatch(ResolutionTier::R10m, &bands_10m) {
            return Ok(report);
        }
    } else if correction == ResolutionTier::R10m {
        return Ok(missing_tier_dir(ResolutionTier::R10m, correction));
    }

    if !bands_60m.is_empty() {
        if let Some(report) = count_mismatch(ResolutionTier::R60m, &bands_60m) {
            return Ok(report);
        }
    } else if correction == ResolutionTier::R60m {
        return Ok(missing_tier_dir(ResolutionTier::R60m, correction));
    }

    if !bands_20m.is_empty() {
        if let Some(report) = count_mismatch(ResolutionTier::R20m, &bands_20m) {
            return Ok(report);
        }
    } else {
        // 20m output is produced at every correction resolution.
        return Ok(ValidationReport::invalid(
            "missing 20m image folder in granule; the 20m tier must always be present",
        ));
    }

    for band in bands_10m.iter().chain(&bands_20m).chain(&bands_60m) {
        if !is_readable_band(band)? {
            warn!(band = %band.display(), "band file failed header probe");
            return Ok(ValidationReport::invalid(format!(
                "unreadable band file: {}",
                band.display()
            )));
        }
        debug!(band = %band.display(), "band file ok");
    }

    Ok(ValidationReport::valid())
}

fn count_mismatch(tier: ResolutionTier, observed: &[PathBuf]) -> Option<ValidationReport> {
    let expected = tier.expected_band_count();
    if observed.len() == expected {
        None
    } else {
        Some(ValidationReport::missing(BandDeficit {
            tier,
            expected,
            observed: observed.len(),
        }))
    }
}

fn missing_tier_dir(tier: ResolutionTier, correction: ResolutionTier) -> ValidationReport {
    ValidationReport::invalid(format!(
        "missing {tier} image folder in granule (required for correction resolution {correction})"
    ))
}

fn first_subdir(dir: &Path) -> Result<Option<PathBuf>, ValidateError> {
    let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();
    Ok(subdirs.into_iter().next())
}

/// All `.jp2` files under `dir`, recursively. An absent directory yields
/// an empty list, which the tier rules interpret as "tier not produced".
fn band_files(dir: &Path) -> Result<Vec<PathBuf>, ValidateError> {
    let mut files = Vec::new();
    if dir.is_dir() {
        collect_band_files(dir, &mut files)?;
        files.sort();
    }
    Ok(files)
}

fn collect_band_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ValidateError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_band_files(&path, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jp2"))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Probe a band file's header for a known raster signature (JP2 container
/// or raw JPEG 2000 codestream).
fn is_readable_band(path: &Path) -> Result<bool, ValidateError> {
    let mut header = [0u8; 12];
    let mut file = fs::File::open(path)?;
    let read = read_fully(&mut file, &mut header)?;
    if read >= JP2_SIGNATURE.len() && header[..12] == JP2_SIGNATURE {
        return Ok(true);
    }
    Ok(read >= J2K_CODESTREAM.len() && header[..4] == J2K_CODESTREAM)
}

fn read_fully(file: &mut fs::File, buf: &mut [u8]) -> Result<usize, ValidateError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_bands(tier_dir: &Path, count: usize) {
        fs::create_dir_all(tier_dir).unwrap();
        for i in 0..count {
            let mut bytes = JP2_SIGNATURE.to_vec();
            bytes.extend_from_slice(&[0u8; 16]);
            fs::write(tier_dir.join(format!("B{i:02}.jp2")), bytes).unwrap();
        }
    }

    fn full_granule(root: &Path) -> PathBuf {
        let img_data = root
            .join("GRANULE")
            .join("L2A_T12UVF_A006415_20180529T160302")
            .join("IMG_DATA");
        write_bands(&img_data.join("R10m"), 7);
        write_bands(&img_data.join("R20m"), 13);
        write_bands(&img_data.join("R60m"), 15);
        img_data
    }

    #[test]
    fn complete_granule_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        full_granule(dir.path());

        let report = validate_granule(dir.path(), ResolutionTier::R20m).unwrap();
        assert!(report.is_valid, "{}", report.reason);
    }

    #[test]
    fn one_band_short_at_20m_cites_expected_count() {
        let dir = tempfile::tempdir().unwrap();
        let img_data = full_granule(dir.path());
        fs::remove_file(img_data.join("R20m").join("B00.jp2")).unwrap();

        let report = validate_granule(dir.path(), ResolutionTier::R20m).unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.reason, "missing 20m bands (12/13)");
        assert_eq!(
            report.missing_bands,
            vec![BandDeficit {
                tier: ResolutionTier::R20m,
                expected: 13,
                observed: 12,
            }]
        );
    }

    #[test]
    fn absent_optional_tiers_are_fine_at_20m() {
        let dir = tempfile::tempdir().unwrap();
        let img_data = dir
            .path()
            .join("GRANULE")
            .join("L2A_T13UGS_A012065_20190628T183312")
            .join("IMG_DATA");
        write_bands(&img_data.join("R20m"), 13);

        let report = validate_granule(dir.path(), ResolutionTier::R20m).unwrap();
        assert!(report.is_valid, "{}", report.reason);
    }

    #[test]
    fn correction_resolution_requires_its_tier() {
        let dir = tempfile::tempdir().unwrap();
        let img_data = dir
            .path()
            .join("GRANULE")
            .join("L2A_T13UGS_A012065_20190628T183312")
            .join("IMG_DATA");
        write_bands(&img_data.join("R20m"), 13);

        let report = validate_granule(dir.path(), ResolutionTier::R10m).unwrap();
        assert!(!report.is_valid);
        assert!(report.reason.contains("10m image folder"));
    }

    #[test]
    fn twenty_metre_tier_is_always_required() {
        let dir = tempfile::tempdir().unwrap();
        let img_data = dir
            .path()
            .join("GRANULE")
            .join("L2A_T13UGS_A012065_20190628T183312")
            .join("IMG_DATA");
        write_bands(&img_data.join("R60m"), 15);

        let report = validate_granule(dir.path(), ResolutionTier::R60m).unwrap();
        assert!(!report.is_valid);
        assert!(report.reason.contains("20m"));
    }

    #[test]
    fn unreadable_band_fails_even_with_correct_counts() {
        let dir = tempfile::tempdir().unwrap();
        let img_data = full_granule(dir.path());
        fs::write(
            img_data.join("R20m").join("B05.jp2"),
            b"not an image at all",
        )
        .unwrap();

        let report = validate_granule(dir.path(), ResolutionTier::R20m).unwrap();
        assert!(!report.is_valid);
        assert!(report.reason.contains("unreadable band file"));
    }

    #[test]
    fn missing_granule_directory_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let report = validate_granule(dir.path(), ResolutionTier::R20m).unwrap();
        assert!(!report.is_valid);
        assert!(report.reason.contains("GRANULE"));
    }

    #[test]
    fn raw_codestream_bands_probe_as_readable() {
        let dir = tempfile::tempdir().unwrap();
        let img_data = full_granule(dir.path());
        let mut bytes = J2K_CODESTREAM.to_vec();
        bytes.extend_from_slice(&[0u8; 32]);
        fs::write(img_data.join("R20m").join("B12.jp2"), bytes).unwrap();

        let report = validate_granule(dir.path(), ResolutionTier::R20m).unwrap();
        assert!(report.is_valid, "{}", report.reason);
    }
}
