//! Immutable data types flowing through the fetch pipeline.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::FetchError;

/// Capacity of each stage queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
pub const DEFAULT_PROBE_WORKERS: usize = 2;
pub const DEFAULT_TRANSFER_WORKERS: usize = 4;

/// Configuration for a pipeline run.
///
/// # Examples
///
/// ```
/// use czds_fetch::FetchOptions;
///
/// let options = FetchOptions::default()
///     .probe_workers(8)
///     .transfer_workers(16)
///     .destination_dir("/var/lib/zones")
///     .force(true);
/// assert_eq!(options.transfer_workers, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Concurrent metadata lookups.
    pub probe_workers: usize,
    /// Concurrent downloads.
    pub transfer_workers: usize,
    /// Bound of each stage queue; senders wait when it is full.
    pub queue_capacity: usize,
    /// Directory receiving `<tld>.zone.gz` files.
    pub destination_dir: PathBuf,
    /// Fetch even when the local copy is at least as new as the remote one.
    pub force: bool,
    /// Commit downloads whose size differs from the advertised length.
    pub keep_anyway: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            probe_workers: DEFAULT_PROBE_WORKERS,
            transfer_workers: DEFAULT_TRANSFER_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            destination_dir: PathBuf::from("./"),
            force: false,
            keep_anyway: false,
        }
    }
}

impl FetchOptions {
    pub fn probe_workers(mut self, workers: usize) -> Self {
        self.probe_workers = workers;
        self
    }

    pub fn transfer_workers(mut self, workers: usize) -> Self {
        self.transfer_workers = workers;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn destination_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.destination_dir = dir.into();
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn keep_anyway(mut self, keep: bool) -> Self {
        self.keep_anyway = keep;
        self
    }

    /// The length check applied to every transfer of this run.
    pub fn length_check(&self) -> LengthCheck {
        if self.keep_anyway {
            LengthCheck::Bypass
        } else {
            LengthCheck::Enforce
        }
    }
}

/// State of an existing destination file, read once per probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileState {
    pub path: PathBuf,
    pub size: u64,
    /// `None` when the platform does not report modification times.
    pub modified: Option<DateTime<Utc>>,
}

impl LocalFileState {
    pub fn from_metadata(path: impl AsRef<Path>, metadata: &Metadata) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        }
    }
}

/// Whether a finished transfer must match the advertised content length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCheck {
    Enforce,
    Bypass,
}

/// Result of probing a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip,
    Fetch(LengthCheck),
}

/// A zone the probe stage decided to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub url: String,
    pub destination: PathBuf,
    /// Content length reported by the API, if any.
    pub api_length: Option<u64>,
    pub check: LengthCheck,
    pub local: Option<LocalFileState>,
}

/// Pipeline stage where an item terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Probe,
    Transfer,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Probe => write!(f, "probe"),
            Stage::Transfer => write!(f, "transfer"),
        }
    }
}

/// Terminal outcome of one submitted zone.
#[derive(Debug)]
pub enum Outcome {
    /// The local copy is up to date.
    Skipped,
    /// The zone was downloaded and published.
    Transferred { bytes: u64 },
    Failed { stage: Stage, error: FetchError },
    /// The run was cancelled before the zone finished.
    Cancelled,
    /// The task holding the zone ended without reporting (it panicked).
    Abandoned,
}

/// One settled zone.
#[derive(Debug)]
pub struct Report {
    pub url: String,
    pub outcome: Outcome,
}

/// Everything a pipeline run settled, in completion order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub submitted: usize,
    pub reports: Vec<Report>,
}

impl RunSummary {
    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    pub fn transferred(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Transferred { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. } | Outcome::Abandoned))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Cancelled))
    }

    pub fn bytes(&self) -> u64 {
        self.reports
            .iter()
            .map(|r| match r.outcome {
                Outcome::Transferred { bytes } => bytes,
                _ => 0,
            })
            .sum()
    }

    /// Submitted zones that have not settled; zero once a run has returned.
    pub fn outstanding(&self) -> usize {
        self.submitted.saturating_sub(self.reports.len())
    }

    pub fn report(&self, url: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.url == url)
    }
}
