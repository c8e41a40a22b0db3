use super::{ensure_parent, header_columns, Exporter};
use crate::exhibitor::FlatRecord;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Byte-order mark so Excel opens the file as UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes `records` as BOM-prefixed CSV.
///
/// The header is the first record's column order. A record missing one of those
/// columns gets an empty field; columns the first record lacks are not written.
pub fn write_delimited<W: Write>(mut out: W, records: &[FlatRecord]) -> Result<()> {
    out.write_all(UTF8_BOM)?;

    let header = header_columns(records);
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&header)?;

    for record in records {
        let row = header.iter().map(|column| record.get(column).map(ToString::to_string));
        writer.write_record(row.map(Option::unwrap_or_default))?;
    }

    writer.flush()?;
    Ok(())
}

/// CSV-only exporter.
pub struct DelimitedExporter {
    path: PathBuf,
}

impl DelimitedExporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Exporter for DelimitedExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn export(&self, records: &[FlatRecord]) -> Result<Vec<PathBuf>> {
        ensure_parent(&self.path)?;
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;

        write_delimited(BufWriter::new(file), records)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        info!("Saved CSV: {} ({} rows)", self.path.display(), records.len());
        Ok(vec![self.path.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhibitor::Cell;

    fn record(pairs: &[(&str, Cell)]) -> FlatRecord {
        let mut r = FlatRecord::new();
        for (k, v) in pairs {
            r.insert(*k, v.clone());
        }
        r
    }

    fn render(records: &[FlatRecord]) -> String {
        let mut buf = Vec::new();
        write_delimited(&mut buf, records).unwrap();
        assert!(buf.starts_with(UTF8_BOM));
        String::from_utf8(buf[UTF8_BOM.len()..].to_vec()).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let rows = vec![
            record(&[("name", "Acme".into()), ("products_count", Cell::Integer(3))]),
            record(&[("name", "Globex".into()), ("products_count", Cell::Integer(0))]),
        ];
        assert_eq!(render(&rows), "name,products_count\nAcme,3\nGlobex,0\n");
    }

    #[test]
    fn test_quotes_special_characters() {
        let rows = vec![record(&[
            ("name", "Smith, Jones & Co".into()),
            ("street", "Main \"Old\" Rd".into()),
            ("keywords", "a\nb".into()),
        ])];
        let out = render(&rows);
        assert!(out.contains("\"Smith, Jones & Co\""));
        assert!(out.contains("\"Main \"\"Old\"\" Rd\""));
        assert!(out.contains("\"a\nb\""));
    }

    #[test]
    fn test_non_ascii_preserved() {
        let rows = vec![record(&[("city", "Düsseldorf".into()), ("name", "Façade Łódź".into())])];
        assert_eq!(render(&rows), "city,name\nDüsseldorf,Façade Łódź\n");
    }

    #[test]
    fn test_missing_column_written_empty() {
        let rows = vec![
            record(&[("a", "1".into()), ("b", "2".into())]),
            record(&[("b", "3".into()), ("c", "ignored".into())]),
        ];
        assert_eq!(render(&rows), "a,b\n1,2\n,3\n");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("exhibitors.csv");
        let exporter = DelimitedExporter::new(&path);

        let written = exporter.export(&[record(&[("name", "Acme".into())])]).unwrap();
        assert_eq!(written, vec![path.clone()]);
        assert_eq!(exporter.name(), "csv");

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
        assert_eq!(&bytes[3..], b"name\nAcme\n");
    }
}
