use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use harvest_logging::harvest_debug;
use ott_core::Record;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of reading the live dataset file.
#[derive(Debug)]
pub enum DatasetLoad {
    Ready(Vec<Record>),
    /// No dataset yet; the first run starts empty.
    Missing,
    /// File present but not parseable as a dataset.
    Corrupt { detail: String },
}

/// Storage shape of one record. Field names are the on-disk contract with
/// the serving layer; keep them in sync with its reader.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    name: String,
    platform: String,
    available_on: String,
    category: String,
    #[serde(default)]
    rating: Option<f64>,
}

impl From<Record> for StoredRecord {
    fn from(record: Record) -> Self {
        Self {
            name: record.name,
            platform: record.platform,
            available_on: record.available_on,
            category: record.category,
            rating: record.rating,
        }
    }
}

impl From<StoredRecord> for Record {
    fn from(stored: StoredRecord) -> Self {
        Self {
            name: stored.name,
            platform: stored.platform,
            available_on: stored.available_on,
            category: stored.category,
            rating: stored.rating,
        }
    }
}

/// Reads and writes the live dataset file.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Distinguishes "no file yet" from "file present but unreadable";
    /// the orchestrator branches on the difference.
    pub fn load(&self) -> Result<DatasetLoad, PersistError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(DatasetLoad::Missing);
            }
            Err(err) => return Err(PersistError::Io(err)),
        };

        match serde_json::from_str::<Vec<StoredRecord>>(&content) {
            Ok(stored) => Ok(DatasetLoad::Ready(
                stored.into_iter().map(Record::from).collect(),
            )),
            Err(err) => Ok(DatasetLoad::Corrupt {
                detail: err.to_string(),
            }),
        }
    }

    /// Writes the full dataset via temp file + rename in the destination
    /// directory, so the prior file stays intact until the new one is
    /// completely on disk.
    pub fn save(&self, records: &[Record]) -> Result<(), PersistError> {
        let dir = self.dataset_dir();
        ensure_data_dir(dir)?;

        let stored: Vec<StoredRecord> = records
            .iter()
            .map(|record| StoredRecord::from(record.clone()))
            .collect();
        let content = serde_json::to_string_pretty(&stored)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|err| PersistError::Io(err.error))?;

        harvest_debug!("Wrote {} records to {:?}", records.len(), self.path);
        Ok(())
    }

    fn dataset_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

fn ensure_data_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::DataDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
    }
    Ok(())
}
