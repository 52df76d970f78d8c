//! Spreadsheet row export.
//!
//! Rows are kept per sheet in `rows/{sheet}.json`, one array of 13 cells per
//! row, ready to be pushed to the spreadsheet by an external job.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::SheetRow;
use crate::storage::LocalStorage;

/// Merge `new_rows` into the stored sheet, deduplicated by detail link.
///
/// Stored rows are kept as they are; new rows whose link is already stored
/// are dropped and the rest go first. Returns the number of rows written.
pub async fn export_rows(
    storage: &LocalStorage,
    rows_dir: &str,
    sheet: &str,
    new_rows: Vec<SheetRow>,
) -> Result<usize> {
    let key = format!("{rows_dir}/{sheet}.json");
    let existing: Vec<SheetRow> = match storage.read_json(&key).await {
        Ok(rows) => rows.unwrap_or_default(),
        Err(e) => {
            log::warn!("Ignoring unreadable rows file {key}: {e}");
            Vec::new()
        }
    };

    let merged = merge_rows(new_rows, existing);
    storage.write_json(&key, &merged).await?;
    log::info!("Exported {} rows to {key}", merged.len());
    Ok(merged.len())
}

/// Stored rows win; a product list shares one link, so all rows of an
/// already exported event are skipped together.
fn merge_rows(new_rows: Vec<SheetRow>, existing: Vec<SheetRow>) -> Vec<SheetRow> {
    let stored_links: HashSet<&str> = existing.iter().map(SheetRow::link).collect();
    let fresh: Vec<SheetRow> = new_rows
        .into_iter()
        .filter(|row| !stored_links.contains(row.link()))
        .collect();

    fresh.into_iter().chain(existing).collect()
}
