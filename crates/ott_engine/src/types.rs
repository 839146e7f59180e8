use std::path::PathBuf;

use thiserror::Error;

use ott_core::ValidationError;

use crate::backup::PruneSummary;
use crate::extract::ExtractError;
use crate::persist::PersistError;

/// Decoded page produced by a fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub html: String,
    pub metadata: FetchMetadata,
}

/// Transport-level details of a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub encoding: String,
    pub byte_len: u64,
}

/// Failure reaching or reading the source page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("http status {0}")]
    Status(u16),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("cannot decode body as {encoding}")]
    Decode { encoding: String },
}

/// Everything that routes an update cycle into the failure branch.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("transport: {0}")]
    Transport(#[from] FetchError),
    #[error("structure: {0}")]
    Structure(#[from] ExtractError),
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("dataset corrupt: {0}")]
    CorruptDataset(String),
    #[error("persistence: {0}")]
    Persistence(#[from] PersistError),
}

/// How an update cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The harvest merged and persisted cleanly.
    Success {
        new_records: usize,
        total_records: usize,
        archive: PathBuf,
    },
    /// The cycle failed and the dataset was rolled back to a backup.
    Recovered {
        error: UpdateError,
        restored_from: PathBuf,
    },
    /// The cycle failed and rolling back failed too.
    RestoreFailed {
        error: UpdateError,
        restore_error: PersistError,
    },
    /// The cycle failed with nothing to roll back to; the dataset file was
    /// not touched.
    NoBackupAvailable { error: UpdateError },
}

/// One full cycle plus the cleanup that ran after it. `pruned` is `None`
/// only for the no-backup terminal, which skips cleanup.
#[derive(Debug)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub pruned: Option<PruneSummary>,
}
