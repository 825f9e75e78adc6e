use anyhow::{anyhow, Result};
use chrono::Local;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::data::record::DISPLAY_COLUMNS;
use crate::data::view::StatementView;

/// Writes the current view out to CSV files.
pub struct StatementExporter;

impl StatementExporter {
    /// Export the visible rows to a timestamp-named CSV file in `dir`.
    ///
    /// When `selection` is non-empty only the selected visible rows are
    /// written, in view order either way. Returns a status message naming the
    /// file and row count.
    pub fn export_csv(
        view: &StatementView,
        selection: &HashSet<usize>,
        dir: &Path,
    ) -> Result<String> {
        if view.row_count() == 0 {
            return Err(anyhow!("no rows to export"));
        }

        let rows: Vec<_> = view
            .records()
            .filter(|record| selection.is_empty() || selection.contains(&record.id))
            .collect();
        if rows.is_empty() {
            return Err(anyhow!("selection matches no visible rows"));
        }

        let path = Self::export_path(dir);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(DISPLAY_COLUMNS)?;
        for record in &rows {
            writer.write_record(record.display_values())?;
        }
        writer.flush()?;

        info!(target: "export", "wrote {} rows to {}", rows.len(), path.display());
        Ok(format!(
            "Exported {} rows to {}",
            rows.len(),
            path.display()
        ))
    }

    fn export_path(dir: &Path) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        dir.join(format!("income_statements_{}.csv", timestamp))
    }
}
