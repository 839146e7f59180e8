//! OTT engine: fetch, extract, persist, backup and the update orchestrator.
mod backup;
mod config;
mod extract;
mod fetch;
mod persist;
mod types;
mod updater;

pub use backup::{BackupStore, PruneSummary};
pub use config::{
    UpdateConfig, ARCHIVE_PREFIX, DATASET_FILENAME, DEFAULT_RETENTION_DAYS, DEFAULT_SOURCE_URL,
    DEFAULT_TABLE_SELECTOR, LOG_PREFIX, LOG_SUFFIX, SAFETY_PREFIX,
};
pub use extract::{ExtractError, RowExtractor, TableRowExtractor};
pub use fetch::{
    FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
pub use persist::{DatasetLoad, DatasetStore, PersistError};
pub use types::{CycleOutcome, CycleReport, FetchError, FetchMetadata, FetchOutput, UpdateError};
pub use updater::run_update_cycle;
