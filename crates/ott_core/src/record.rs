/// One row as it came out of the source table, before any cleanup.
///
/// Field order follows the table columns: title, digital release date,
/// streaming platform, category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub name: String,
    pub available_on: String,
    pub platform: String,
    pub category: String,
}

/// A single title entry in the dataset.
///
/// Identity is the (name, platform) pair, compared exactly after trimming
/// surrounding whitespace. The remaining fields are descriptive only: a
/// later harvest never changes them on a record that already exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub platform: String,
    pub available_on: String,
    pub category: String,
    /// IMDb-style rating; the current source carries none, so this stays
    /// `None` for harvested rows but is preserved for loaded ones.
    pub rating: Option<f64>,
}

impl Record {
    /// Builds a record from a raw table row, trimming every text field.
    pub fn from_raw(raw: RawRow) -> Self {
        Self {
            name: raw.name.trim().to_owned(),
            platform: raw.platform.trim().to_owned(),
            available_on: raw.available_on.trim().to_owned(),
            category: raw.category.trim().to_owned(),
            rating: None,
        }
    }

    /// The identity key: (name, platform), whitespace-trimmed.
    pub fn identity(&self) -> (&str, &str) {
        (self.name.trim(), self.platform.trim())
    }
}
