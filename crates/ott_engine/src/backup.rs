use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::Local;

use harvest_logging::{harvest_info, harvest_warn};

use crate::config::{ARCHIVE_PREFIX, LOG_PREFIX, LOG_SUFFIX, SAFETY_PREFIX};
use crate::persist::PersistError;

/// What one pruning pass removed. Per-file failures are counted, never
/// propagated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneSummary {
    pub backups_removed: usize,
    pub logs_removed: usize,
    pub skipped: usize,
}

/// Creates, finds, restores and prunes the timestamped dataset copies.
/// Both lineages live next to the dataset file itself.
#[derive(Debug, Clone)]
pub struct BackupStore {
    data_dir: PathBuf,
}

impl BackupStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Copies the live dataset to a safety-tagged path before the cycle
    /// touches anything. `None` when there is no dataset yet.
    pub fn snapshot(&self, dataset: &Path) -> Result<Option<PathBuf>, PersistError> {
        if !dataset.exists() {
            return Ok(None);
        }
        let target = self.stamped_path(SAFETY_PREFIX);
        fs::copy(dataset, &target)?;
        harvest_info!("Created safety backup: {:?}", target);
        Ok(Some(target))
    }

    /// Copies the just-persisted dataset to an archival-tagged path.
    pub fn archive(&self, dataset: &Path) -> Result<PathBuf, PersistError> {
        let target = self.stamped_path(ARCHIVE_PREFIX);
        fs::copy(dataset, &target)?;
        harvest_info!("Created archival backup: {:?}", target);
        Ok(target)
    }

    /// The backup, of either lineage, with the greatest embedded timestamp;
    /// filename breaks stamp ties. Comparing stamps rather than whole names
    /// keeps `safety` files from outranking `backup` files alphabetically.
    pub fn latest(&self) -> Result<Option<PathBuf>, PersistError> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(PersistError::Io(err)),
        };

        let mut best: Option<(String, String, PathBuf)> = None;
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = match file_name.to_str() {
                Some(name) => name,
                None => continue,
            };
            let stamp = match backup_stamp(name) {
                Some(stamp) => stamp.to_string(),
                None => continue,
            };
            let candidate = (stamp, name.to_string(), entry.path());
            let better = match &best {
                Some(current) => (&candidate.0, &candidate.1) > (&current.0, &current.1),
                None => true,
            };
            if better {
                best = Some(candidate);
            }
        }
        Ok(best.map(|(_, _, path)| path))
    }

    /// Overwrites the live dataset with a backup's content.
    pub fn restore(&self, backup: &Path, dataset: &Path) -> Result<(), PersistError> {
        fs::copy(backup, dataset)?;
        harvest_info!("Restored {:?} from {:?}", dataset, backup);
        Ok(())
    }

    /// Removes backups (both lineages) and rotated logs older than
    /// `retention`, by modification time.
    pub fn prune_older_than(&self, logs_dir: &Path, retention: Duration) -> PruneSummary {
        let cutoff = SystemTime::now()
            .checked_sub(retention)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        self.prune_with_cutoff(logs_dir, cutoff)
    }

    /// Pruning against an explicit cutoff instant. Everything modified
    /// before `cutoff` and matching a backup or log name goes.
    pub fn prune_with_cutoff(&self, logs_dir: &Path, cutoff: SystemTime) -> PruneSummary {
        let mut skipped = 0;
        let backups_removed = prune_dir(&self.data_dir, cutoff, is_backup_name, &mut skipped);
        let logs_removed = prune_dir(logs_dir, cutoff, is_log_name, &mut skipped);
        harvest_info!(
            "Cleanup removed {} backup(s) and {} log(s), {} skipped",
            backups_removed,
            logs_removed,
            skipped
        );
        PruneSummary {
            backups_removed,
            logs_removed,
            skipped,
        }
    }

    fn stamped_path(&self, prefix: &str) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        self.data_dir.join(format!("{prefix}{stamp}.json"))
    }
}

/// The sortable `YYYYMMDD_HHMMSS` portion of a backup filename, from either
/// lineage.
fn backup_stamp(name: &str) -> Option<&str> {
    let stem = name.strip_suffix(".json")?;
    stem.strip_prefix(ARCHIVE_PREFIX)
        .or_else(|| stem.strip_prefix(SAFETY_PREFIX))
}

fn is_backup_name(name: &str) -> bool {
    backup_stamp(name).is_some()
}

fn is_log_name(name: &str) -> bool {
    name.starts_with(LOG_PREFIX) && name.ends_with(LOG_SUFFIX)
}

fn prune_dir(
    dir: &Path,
    cutoff: SystemTime,
    matches: fn(&str) -> bool,
    skipped: &mut usize,
) -> usize {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            if err.kind() != io::ErrorKind::NotFound {
                harvest_warn!("Cannot read {:?} for cleanup: {}", dir, err);
            }
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => {
                *skipped += 1;
                continue;
            }
        };
        let file_name = entry.file_name();
        let name = match file_name.to_str() {
            Some(name) => name,
            None => continue,
        };
        if !matches(name) {
            continue;
        }
        match modified_before(&entry, cutoff) {
            Ok(false) => {}
            Ok(true) => match fs::remove_file(entry.path()) {
                Ok(()) => {
                    harvest_info!("Deleted old file: {}", name);
                    removed += 1;
                }
                Err(err) => {
                    harvest_warn!("Could not delete {:?}: {}", entry.path(), err);
                    *skipped += 1;
                }
            },
            Err(err) => {
                harvest_warn!("Could not stat {:?}: {}", entry.path(), err);
                *skipped += 1;
            }
        }
    }
    removed
}

fn modified_before(entry: &fs::DirEntry, cutoff: SystemTime) -> io::Result<bool> {
    let modified = entry.metadata()?.modified()?;
    Ok(modified < cutoff)
}
