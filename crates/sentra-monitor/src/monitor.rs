use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::sample::{ProgressSample, format_bytes};

/// Default wall-clock interval between size polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Diagnostics returned by [`TransferMonitor::finish`].
#[derive(Debug, Clone)]
pub struct MonitorReport {
    /// Total time the monitor was alive.
    pub elapsed: Duration,

    /// Every sample taken, oldest first. Always contains at least the
    /// sample taken at startup and the one taken at shutdown.
    pub samples: Vec<ProgressSample>,
}

impl MonitorReport {
    /// Final observed size, if any sample was taken.
    pub fn final_size(&self) -> Option<u64> {
        self.samples.last().map(|s| s.bytes_observed)
    }
}

/// Observes a file being written by someone else.
///
/// The monitor polls the destination's size at a fixed interval on a
/// background task and logs throughput. It never reads the writer's
/// counters and never errors: a missing file is reported as zero bytes,
/// which is exactly what "the transfer has not produced data yet" looks
/// like from outside.
///
/// `finish` consumes the monitor, so it cannot be stopped twice, and it
/// blocks until the sampling task has observed the stop signal and
/// exited — no orphaned task survives a transfer.
#[derive(Debug)]
pub struct TransferMonitor {
    stop: watch::Sender<bool>,
    task: JoinHandle<Vec<ProgressSample>>,
    started: Instant,
}

impl TransferMonitor {
    /// Start monitoring `path` at the default 30 s interval.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        Self::with_interval(path, DEFAULT_POLL_INTERVAL)
    }

    /// Start monitoring `path`, polling every `interval`.
    pub fn with_interval(path: impl Into<PathBuf>, interval: Duration) -> Self {
        let path = path.into();
        let (stop, stopped) = watch::channel(false);
        let started = Instant::now();
        let task = tokio::spawn(sample_loop(path, interval, stopped, started));
        Self {
            stop,
            task,
            started,
        }
    }

    /// Signal the sampling loop to stop and wait for it to exit.
    pub async fn finish(self) -> MonitorReport {
        let _ = self.stop.send(true);
        let samples = self.task.await.unwrap_or_default();
        let elapsed = self.started.elapsed();
        info!(
            elapsed_secs = elapsed.as_secs_f64(),
            samples = samples.len(),
            "transfer monitoring finished"
        );
        MonitorReport { elapsed, samples }
    }
}

async fn sample_loop(
    path: PathBuf,
    interval: Duration,
    mut stopped: watch::Receiver<bool>,
    started: Instant,
) -> Vec<ProgressSample> {
    let mut samples = Vec::new();
    let mut previous: Option<(u64, Instant)> = None;

    loop {
        take_sample(&path, started, &mut previous, &mut samples).await;

        tokio::select! {
            // Fires on the stop signal, or immediately if the owning
            // monitor was dropped without finish().
            _ = stopped.changed() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    // Record where the file ended up once the writer is done.
    take_sample(&path, started, &mut previous, &mut samples).await;
    samples
}

async fn take_sample(
    path: &Path,
    started: Instant,
    previous: &mut Option<(u64, Instant)>,
    samples: &mut Vec<ProgressSample>,
) {
    let observed = observed_size(path).await;
    let now = Instant::now();

    let rate = match *previous {
        Some((prior, at)) => {
            let secs = now.duration_since(at).as_secs_f64();
            if secs > 0.0 {
                observed.saturating_sub(prior) as f64 / secs
            } else {
                0.0
            }
        }
        None => 0.0,
    };

    debug!(
        file = %path.display(),
        total = %format_bytes(observed),
        rate = %format!("{}/s", format_bytes(rate as u64)),
        "transfer progress"
    );

    samples.push(ProgressSample {
        bytes_observed: observed,
        elapsed: started.elapsed(),
        rate_bytes_per_sec: rate,
    });
    *previous = Some((observed, now));
}

/// Size of the file right now. A file that does not exist, is not a
/// regular file, or cannot be stat'ed counts as not yet present.
async fn observed_size(path: &Path) -> u64 {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[tokio::test]
    async fn missing_file_reports_zero_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let monitor =
            TransferMonitor::with_interval(dir.path().join("never"), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(50)).await;
        let report = monitor.finish().await;

        assert!(!report.samples.is_empty());
        assert!(report.samples.iter().all(|s| s.bytes_observed == 0));
    }

    #[tokio::test]
    async fn observes_growth_between_samples() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("growing.bin");

        let monitor = TransferMonitor::with_interval(&target, Duration::from_millis(25));

        let mut file = std::fs::File::create(&target).unwrap();
        for _ in 0..4 {
            file.write_all(&[0u8; 64 * 1024]).unwrap();
            file.flush().unwrap();
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        drop(file);

        let report = monitor.finish().await;
        assert_eq!(report.final_size(), Some(4 * 64 * 1024));
        assert!(report.samples.iter().any(|s| s.rate_bytes_per_sec > 0.0));
    }

    #[tokio::test]
    async fn finish_returns_within_one_interval() {
        let dir = tempfile::tempdir().unwrap();
        let interval = Duration::from_secs(30);
        let monitor = TransferMonitor::with_interval(dir.path().join("idle"), interval);

        let started = Instant::now();
        let _ = monitor.finish().await;
        assert!(started.elapsed() < interval);
    }

    #[tokio::test]
    async fn does_not_disturb_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data.bin");
        std::fs::write(&target, vec![9u8; 128 * 1024]).unwrap();

        let monitor = TransferMonitor::with_interval(&target, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(40)).await;
        let _ = monitor.finish().await;

        let contents = std::fs::read(&target).unwrap();
        assert_eq!(contents.len(), 128 * 1024);
        assert!(contents.iter().all(|&b| b == 9));
    }
}
