use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use harvest_logging::harvest_debug;
use ott_core::RawRow;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("table selector {selector:?} is not valid CSS")]
    InvalidSelector { selector: String },
    #[error("no table matches {selector:?} in the fetched page")]
    TableMissing { selector: String },
}

/// Turns one fetched page into raw rows, exactly as the source table holds
/// them. No deduplication, no validation.
pub trait RowExtractor: Send + Sync {
    fn extract(&self, html: &str) -> Result<Vec<RawRow>, ExtractError>;
}

/// Reads the release table: the configured selector locates the table, its
/// `tbody tr` elements are the rows, and the first four cell texts become
/// (name, available_on, platform, category). Rows with fewer than four
/// cells are skipped; extra cells are ignored.
#[derive(Debug, Clone)]
pub struct TableRowExtractor {
    css: String,
    table: Selector,
    rows: Selector,
    cells: Selector,
}

impl TableRowExtractor {
    /// Parses the selector up front so a bad one is rejected at startup,
    /// not mid-cycle.
    pub fn new(table_selector: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            css: table_selector.to_string(),
            table: parse_selector(table_selector)?,
            rows: parse_selector("tbody tr")?,
            cells: parse_selector("td")?,
        })
    }
}

impl RowExtractor for TableRowExtractor {
    fn extract(&self, html: &str) -> Result<Vec<RawRow>, ExtractError> {
        let document = Html::parse_document(html);
        let table = match document.select(&self.table).next() {
            Some(table) => table,
            None => {
                return Err(ExtractError::TableMissing {
                    selector: self.css.clone(),
                })
            }
        };

        let mut rows = Vec::new();
        for row in table.select(&self.rows) {
            let cells: Vec<String> = row.select(&self.cells).map(cell_text).collect();
            match cells.as_slice() {
                [name, available_on, platform, category, ..] => rows.push(RawRow {
                    name: name.clone(),
                    available_on: available_on.clone(),
                    platform: platform.clone(),
                    category: category.clone(),
                }),
                short => harvest_debug!("Skipping a row with {} cells", short.len()),
            }
        }
        Ok(rows)
    }
}

fn parse_selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::InvalidSelector {
        selector: css.to_string(),
    })
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}
