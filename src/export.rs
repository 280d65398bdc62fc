//! CSV export of result tables.

use crate::db::QueryResult;
use crate::error::{DashError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// An encoded table and the file name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl CsvExport {
    /// Writes the export into `dir` and returns the full path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| {
            DashError::export(format!("Cannot create {}: {e}", dir.display()))
        })?;

        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .map_err(|e| DashError::export(format!("Cannot write {}: {e}", path.display())))?;

        debug!("Wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

/// Encodes a table as UTF-8 CSV: a header row of column names, then one
/// record per row. NULL becomes an empty field.
pub fn to_csv(table: &QueryResult) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !table.columns.is_empty() {
        writer
            .write_record(table.column_names())
            .map_err(|e| DashError::export(e.to_string()))?;
    }

    for row in &table.rows {
        writer
            .write_record(row.iter().map(|value| value.to_csv_field()))
            .map_err(|e| DashError::export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| DashError::export(e.to_string()))
}

/// File name for an export of the query with this label.
///
/// Path separators in the label are replaced with `_`.
pub fn export_file_name(label: &str) -> String {
    let safe: String = label
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}.csv")
}
