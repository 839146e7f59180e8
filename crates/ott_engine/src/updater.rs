use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};

use harvest_logging::{harvest_error, harvest_info, harvest_warn};
use ott_core::{merge, sort_records, validate, Record, ReleaseRanker};

use crate::backup::BackupStore;
use crate::config::UpdateConfig;
use crate::extract::RowExtractor;
use crate::fetch::Fetcher;
use crate::persist::{DatasetLoad, DatasetStore};
use crate::types::{CycleOutcome, CycleReport, UpdateError};

/// Runs one full harvest cycle: safety snapshot, fetch, extract, validate,
/// merge, sort, persist, archive, then rollback on failure and retention
/// cleanup. Every failure is resolved here; callers only see the outcome.
pub async fn run_update_cycle(
    config: &UpdateConfig,
    fetcher: &dyn Fetcher,
    extractor: &dyn RowExtractor,
) -> CycleReport {
    let store = DatasetStore::new(config.dataset_path());
    let backups = BackupStore::new(&config.data_dir);

    harvest_info!("Update cycle started for {}", config.source_url);

    let safety = match backups.snapshot(store.path()) {
        Ok(Some(path)) => Some(path),
        Ok(None) => {
            harvest_info!("No dataset yet; skipping the safety backup");
            None
        }
        Err(err) => {
            // Snapshot failure does not abort the cycle.
            harvest_warn!("Safety backup failed, continuing: {}", err);
            None
        }
    };

    let outcome = match harvest_and_persist(config, fetcher, extractor, &store, &backups).await {
        Ok((new_records, total_records, archive)) => {
            if let Some(path) = &safety {
                remove_safety(path);
            }
            harvest_info!(
                "Update succeeded: {} new record(s), {} total",
                new_records,
                total_records
            );
            CycleOutcome::Success {
                new_records,
                total_records,
                archive,
            }
        }
        Err(error) => recover(&backups, &store, error),
    };

    let pruned = match &outcome {
        CycleOutcome::NoBackupAvailable { .. } => None,
        _ => Some(backups.prune_older_than(&config.logs_dir, config.retention())),
    };

    CycleReport { outcome, pruned }
}

async fn harvest_and_persist(
    config: &UpdateConfig,
    fetcher: &dyn Fetcher,
    extractor: &dyn RowExtractor,
    store: &DatasetStore,
    backups: &BackupStore,
) -> Result<(usize, usize, PathBuf), UpdateError> {
    let page = fetcher.fetch(&config.source_url).await?;
    harvest_info!(
        "Fetched {} ({} bytes, {})",
        page.metadata.final_url,
        page.metadata.byte_len,
        page.metadata.encoding
    );

    let rows = extractor.extract(&page.html)?;
    harvest_info!("Extracted {} row(s) from the release table", rows.len());

    let harvested: Vec<Record> = rows.into_iter().map(Record::from_raw).collect();
    validate(&harvested)?;
    harvest_info!("Validation passed, {} record(s) harvested", harvested.len());

    let existing = match store.load()? {
        DatasetLoad::Ready(records) => records,
        DatasetLoad::Missing => Vec::new(),
        DatasetLoad::Corrupt { detail } => return Err(UpdateError::CorruptDataset(detail)),
    };

    let (merged, new_records) = merge(existing, harvested);
    harvest_info!("Merged {} new record(s)", new_records);

    let ranker = ReleaseRanker::for_year(Local::now().year());
    let sorted = sort_records(merged, &ranker);
    let total_records = sorted.len();

    store.save(&sorted)?;
    let archive = backups.archive(store.path())?;

    Ok((new_records, total_records, archive))
}

/// The failure branch: roll the dataset back to the freshest backup of
/// either lineage. A restore failure, or having nothing to restore from,
/// is terminal.
fn recover(backups: &BackupStore, store: &DatasetStore, error: UpdateError) -> CycleOutcome {
    harvest_error!("Update failed: {}", error);

    let latest = match backups.latest() {
        Ok(Some(path)) => path,
        Ok(None) => {
            harvest_error!("No backup available; dataset left as it was");
            return CycleOutcome::NoBackupAvailable { error };
        }
        Err(restore_error) => {
            harvest_error!("Could not enumerate backups: {}", restore_error);
            return CycleOutcome::RestoreFailed {
                error,
                restore_error,
            };
        }
    };

    match backups.restore(&latest, store.path()) {
        Ok(()) => CycleOutcome::Recovered {
            error,
            restored_from: latest,
        },
        Err(restore_error) => {
            harvest_error!("Restore from {:?} failed: {}", latest, restore_error);
            CycleOutcome::RestoreFailed {
                error,
                restore_error,
            }
        }
    }
}

fn remove_safety(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => harvest_info!("Removed safety backup after success: {:?}", path),
        Err(err) => harvest_warn!("Could not remove safety backup {:?}: {}", path, err),
    }
}
