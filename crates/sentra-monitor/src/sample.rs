use std::time::Duration;

/// One observation of a transfer in progress.
///
/// Samples are delivered to the log and collected for the final report;
/// nothing holds them after that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    /// File size on disk at sampling time.
    pub bytes_observed: u64,

    /// Time since the monitor started.
    pub elapsed: Duration,

    /// Estimated throughput since the previous sample.
    pub rate_bytes_per_sec: f64,
}

/// Render a byte count in human units, `bytes` through `TB`.
pub fn format_bytes(num: u64) -> String {
    const UNITS: [&str; 4] = ["bytes", "KB", "MB", "GB"];
    let mut value = num as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} TB")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_small_counts_as_bytes() {
        assert_eq!(format_bytes(0), "0.0 bytes");
        assert_eq!(format_bytes(512), "512.0 bytes");
    }

    #[test]
    fn formats_each_unit() {
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
        assert_eq!(format_bytes(2 * 1024u64.pow(4)), "2.0 TB");
    }

    #[test]
    fn huge_counts_stay_in_tb() {
        assert_eq!(format_bytes(2048 * 1024u64.pow(4)), "2048.0 TB");
    }
}
