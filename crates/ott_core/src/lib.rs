//! OTT core: pure record types, release-date ranking and dataset operations.
mod dataset;
mod rank;
mod record;

pub use dataset::{merge, sort_records, validate, ValidationError};
pub use rank::{RankKey, ReleaseRanker, Tier};
pub use record::{RawRow, Record};
