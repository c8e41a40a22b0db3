use super::{ensure_parent, ordered_columns, DelimitedExporter, Exporter};
use crate::exhibitor::{Cell, FlatRecord};
use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tracing::info;

/// CSV plus a single-sheet Excel workbook with the preferred column order.
pub struct WorkbookExporter {
    delimited: DelimitedExporter,
    path: PathBuf,
}

impl WorkbookExporter {
    pub fn new(csv_path: impl AsRef<Path>, xlsx_path: impl AsRef<Path>) -> Self {
        Self {
            delimited: DelimitedExporter::new(csv_path),
            path: xlsx_path.as_ref().to_path_buf(),
        }
    }

    fn write_workbook(&self, records: &[FlatRecord]) -> Result<()> {
        let columns = ordered_columns(records);
        let bold = Format::new().set_bold();

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        for (col, name) in columns.iter().enumerate() {
            let col = u16::try_from(col).context("Too many columns for a worksheet")?;
            sheet.write_string_with_format(0, col, name.as_str(), &bold)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = u32::try_from(idx + 1).context("Too many rows for a worksheet")?;
            for (col, name) in columns.iter().enumerate() {
                let col = u16::try_from(col).context("Too many columns for a worksheet")?;
                match record.get(name) {
                    Some(Cell::Integer(n)) => {
                        sheet.write_number(row, col, *n as f64)?;
                    }
                    Some(Cell::Text(s)) if !s.is_empty() => {
                        sheet.write_string(row, col, s.as_str())?;
                    }
                    _ => {}
                }
            }
        }

        ensure_parent(&self.path)?;
        workbook.save(&self.path)?;
        Ok(())
    }
}

impl Exporter for WorkbookExporter {
    fn name(&self) -> &'static str {
        "csv+xlsx"
    }

    fn export(&self, records: &[FlatRecord]) -> Result<Vec<PathBuf>> {
        let mut written = self.delimited.export(records)?;

        self.write_workbook(records)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!("Saved Excel: {} ({} rows)", self.path.display(), records.len());

        written.push(self.path.clone());
        Ok(written)
    }
}
