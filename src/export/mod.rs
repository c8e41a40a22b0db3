//! Writers for the collected exhibitor rows (CSV, Excel).
//!
//! The exporter is chosen once at startup: with the `xlsx` feature the run writes
//! both files, without it only the CSV.

mod delimited;
#[cfg(feature = "xlsx")]
mod workbook;

pub use delimited::{write_delimited, DelimitedExporter, UTF8_BOM};
#[cfg(feature = "xlsx")]
pub use workbook::WorkbookExporter;

use crate::config::Config;
use crate::exhibitor::FlatRecord;
use anyhow::Result;
use std::path::PathBuf;

/// Spreadsheet column order; columns not listed here follow in first-seen order.
pub const PREFERRED_COLUMNS: [&str; 24] = [
    "name",
    "exhibitor_id",
    "rewriteId",
    "country",
    "country_iso3",
    "city",
    "zip",
    "street",
    "phone",
    "fax",
    "email",
    "homepage",
    "hall",
    "booth",
    "logo",
    "keywords",
    "products_count",
    "exhibition_id",
    "exhibition_name",
    "exhibition_start",
    "exhibition_end",
    "last_approval_date",
    "sortKey",
    "postal_formatted",
];

/// Persists a complete result set.
pub trait Exporter {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// Writes every record and returns the files created, in write order.
    fn export(&self, records: &[FlatRecord]) -> Result<Vec<PathBuf>>;
}

/// Picks the exporter this build supports.
#[cfg(feature = "xlsx")]
pub fn select(config: &Config) -> Box<dyn Exporter> {
    Box::new(WorkbookExporter::new(&config.out_csv, &config.out_xlsx))
}

/// Picks the exporter this build supports.
#[cfg(not(feature = "xlsx"))]
pub fn select(config: &Config) -> Box<dyn Exporter> {
    tracing::warn!(
        "Excel export not compiled in; skipping {}. Rebuild with `--features xlsx` to enable it.",
        config.out_xlsx.display()
    );
    Box::new(DelimitedExporter::new(&config.out_csv))
}

/// Header of the first record, in insertion order.
pub fn header_columns(records: &[FlatRecord]) -> Vec<String> {
    records
        .first()
        .map(|r| r.columns().map(str::to_string).collect())
        .unwrap_or_default()
}

/// [`PREFERRED_COLUMNS`] present in the data, then every other column in first-seen order.
pub fn ordered_columns(records: &[FlatRecord]) -> Vec<String> {
    let mut seen: Vec<&str> = Vec::new();
    for column in records.iter().flat_map(FlatRecord::columns) {
        if !seen.contains(&column) {
            seen.push(column);
        }
    }

    let mut ordered: Vec<String> = PREFERRED_COLUMNS
        .iter()
        .filter(|c| seen.contains(*c))
        .map(|c| c.to_string())
        .collect();
    ordered.extend(
        seen.iter().filter(|c| !PREFERRED_COLUMNS.contains(*c)).map(|c| c.to_string()),
    );
    ordered
}

/// Creates the parent directory of an output path if needed.
pub(crate) fn ensure_parent(path: &std::path::Path) -> Result<()> {
    use anyhow::Context;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
