//! Transfer progress monitoring.
//!
//! The monitor watches a file's size on disk while some other task writes
//! to it. It deliberately does not share state with the writer: the write
//! loop pays no synchronization cost, and the monitor works for any writer
//! (this process, a subprocess, another machine via NFS). The trade-off is
//! coarse, eventually-consistent progress — a write in flight between two
//! samples reports as zero throughput until the next poll.

mod monitor;
mod sample;

pub use monitor::{DEFAULT_POLL_INTERVAL, MonitorReport, TransferMonitor};
pub use sample::{ProgressSample, format_bytes};
