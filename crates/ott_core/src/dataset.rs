use std::collections::HashSet;

use thiserror::Error;

use crate::rank::ReleaseRanker;
use crate::record::Record;

/// Why a harvested row set was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("harvest produced no records")]
    Empty,
    #[error("record {index} has a blank {field}")]
    BlankField { index: usize, field: &'static str },
}

/// Appends every incoming record whose identity is not already present,
/// returning the grown dataset and the number of records actually added.
///
/// Existing records are never touched: a reappearing (name, platform) pair
/// with a different date, category or rating is dropped, not applied.
/// Duplicate identities within `incoming` collapse to the first occurrence.
pub fn merge(existing: Vec<Record>, incoming: Vec<Record>) -> (Vec<Record>, usize) {
    let mut seen: HashSet<(String, String)> = existing.iter().map(owned_identity).collect();

    let mut merged = existing;
    let mut added = 0;
    for record in incoming {
        if seen.insert(owned_identity(&record)) {
            merged.push(record);
            added += 1;
        }
    }
    (merged, added)
}

fn owned_identity(record: &Record) -> (String, String) {
    let (name, platform) = record.identity();
    (name.to_owned(), platform.to_owned())
}

/// Stable sort by `(rank of available_on, name)`: titles marked "soon"
/// first, then dated titles newest-first, then everything else, with ties
/// broken alphabetically. Returns a new ordering rather than mutating in
/// place so callers can compare before and after.
pub fn sort_records(mut records: Vec<Record>, ranker: &ReleaseRanker) -> Vec<Record> {
    records.sort_by_cached_key(|record| (ranker.key(&record.available_on), record.name.clone()));
    records
}

/// Checks a harvested row set before it is merged: it must be non-empty and
/// every record must carry a usable identity. Descriptive fields are free
/// to be blank; `available_on` legitimately is for unscheduled titles.
pub fn validate(records: &[Record]) -> Result<(), ValidationError> {
    if records.is_empty() {
        return Err(ValidationError::Empty);
    }
    for (index, record) in records.iter().enumerate() {
        if record.name.trim().is_empty() {
            return Err(ValidationError::BlankField {
                index,
                field: "name",
            });
        }
        if record.platform.trim().is_empty() {
            return Err(ValidationError::BlankField {
                index,
                field: "platform",
            });
        }
    }
    Ok(())
}
