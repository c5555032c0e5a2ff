use std::sync::Arc;

/// A snapshot of download progress, delivered to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkProgress {
    /// Bytes written to disk so far.
    pub bytes_so_far: u64,

    /// Total expected bytes, if the server sent Content-Length.
    pub total_bytes: Option<u64>,

    /// Completion percentage, `None` when the total is unknown.
    pub percent: Option<f64>,
}

impl ChunkProgress {
    pub(crate) fn new(bytes_so_far: u64, total_bytes: Option<u64>) -> Self {
        let percent = total_bytes.and_then(|total| {
            if total == 0 {
                None
            } else {
                Some((bytes_so_far as f64 / total as f64) * 100.0)
            }
        });
        Self {
            bytes_so_far,
            total_bytes,
            percent,
        }
    }

    /// Whole percentage points completed, used for callback throttling.
    pub(crate) fn percent_floor(&self) -> Option<u64> {
        self.percent.map(|p| p.floor() as u64)
    }
}

/// Callback invoked after chunk writes.
///
/// Invocation is throttled to whole-percentage-point changes when the total
/// size is known, so implementations can be arbitrarily slow without
/// dragging down the write loop.
pub type ProgressFn = Arc<dyn Fn(&ChunkProgress) + Send + Sync>;
