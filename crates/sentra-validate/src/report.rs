use std::fmt;

/// Fixed pixel-spacing groupings used by corrected products to organize
/// band files into sub-folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionTier {
    R10m,
    R20m,
    R60m,
}

impl ResolutionTier {
    /// Band files a complete correction writes at this tier.
    pub fn expected_band_count(self) -> usize {
        match self {
            ResolutionTier::R10m => 7,
            ResolutionTier::R20m => 13,
            ResolutionTier::R60m => 15,
        }
    }

    /// Sub-folder name under `IMG_DATA`.
    pub fn dir_name(self) -> &'static str {
        match self {
            ResolutionTier::R10m => "R10m",
            ResolutionTier::R20m => "R20m",
            ResolutionTier::R60m => "R60m",
        }
    }

    /// Pixel spacing in metres.
    pub fn metres(self) -> u32 {
        match self {
            ResolutionTier::R10m => 10,
            ResolutionTier::R20m => 20,
            ResolutionTier::R60m => 60,
        }
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.metres())
    }
}

/// A tier whose band-file count did not match expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandDeficit {
    pub tier: ResolutionTier,
    pub expected: usize,
    pub observed: usize,
}

/// Verdict produced after a transfer's bytes are fully on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub is_valid: bool,

    /// Human-readable explanation; "valid product" when valid.
    pub reason: String,

    /// Tiers with missing or surplus band files, when that is why the
    /// artifact was rejected.
    pub missing_bands: Vec<BandDeficit>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: "valid product".to_string(),
            missing_bands: Vec::new(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
            missing_bands: Vec::new(),
        }
    }

    pub fn missing(deficit: BandDeficit) -> Self {
        Self {
            is_valid: false,
            reason: format!(
                "missing {} bands ({}/{})",
                deficit.tier, deficit.observed, deficit.expected
            ),
            missing_bands: vec![deficit],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_counts_per_tier() {
        assert_eq!(ResolutionTier::R10m.expected_band_count(), 7);
        assert_eq!(ResolutionTier::R20m.expected_band_count(), 13);
        assert_eq!(ResolutionTier::R60m.expected_band_count(), 15);
    }

    #[test]
    fn missing_report_names_tier_and_counts() {
        let report = ValidationReport::missing(BandDeficit {
            tier: ResolutionTier::R20m,
            expected: 13,
            observed: 12,
        });
        assert!(!report.is_valid);
        assert_eq!(report.reason, "missing 20m bands (12/13)");
        assert_eq!(report.missing_bands.len(), 1);
    }
}
