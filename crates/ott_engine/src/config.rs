use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::fetch::FetchSettings;

/// On-disk names shared with the serving layer that reads the dataset.
/// Renaming any of these is a breaking change.
pub const DATASET_FILENAME: &str = "movies.json";
pub const SAFETY_PREFIX: &str = "movies_safety_";
pub const ARCHIVE_PREFIX: &str = "movies_backup_";
pub const LOG_PREFIX: &str = "update_";
pub const LOG_SUFFIX: &str = ".log";

pub const DEFAULT_SOURCE_URL: &str = "https://trendraja.in/telugu-movie-ott-release-dates-2021/";
pub const DEFAULT_TABLE_SELECTOR: &str = "table#tablepress-116";
pub const DEFAULT_RETENTION_DAYS: u64 = 30;

/// Everything one update cycle needs, resolved up front so no component
/// reads globals or re-parses configuration mid-cycle.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Directory holding the dataset file and both backup lineages.
    pub data_dir: PathBuf,
    /// Directory holding the per-day update logs.
    pub logs_dir: PathBuf,
    pub source_url: Url,
    /// CSS selector locating the release table in the fetched page.
    pub table_selector: String,
    pub fetch: FetchSettings,
    /// Backups and logs older than this many days are pruned.
    pub retention_days: u64,
}

impl UpdateConfig {
    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(DATASET_FILENAME)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_days.saturating_mul(60 * 60 * 24))
    }
}
