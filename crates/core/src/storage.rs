// crates/core/src/storage.rs
//! Workbook persistence as JSON files with atomic writes.
//!
//! Spreadsheet-format (xlsx) I/O is out of scope; the tool owns its own
//! JSON representation and leaves format conversion to external tooling.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{BudgetError, Result};
use crate::schema::SCHEMA_VERSION_LABEL;
use crate::sheet::{CellValue, Sheet, Workbook};
use crate::validation::checked_path;
use crate::version::VersionInfo;

/// Name of the sheet carrying project-level settings, including the
/// recorded schema version.
pub const SUMMARY_SHEET: &str = "Summary";

/// A fresh workbook: a summary sheet stamped with the schema version the
/// given build expects.
pub fn new_workbook(info: &VersionInfo) -> Workbook {
    let mut summary = Sheet::new(SUMMARY_SHEET);
    summary.append_row(vec![CellValue::text("Setting"), CellValue::text("Value")]);
    summary.append_row(vec![
        CellValue::text(SCHEMA_VERSION_LABEL),
        CellValue::text(info.schema().as_str()),
    ]);
    let mut workbook = Workbook::new();
    // A brand-new workbook cannot clash on the summary name.
    let _ = workbook.add_sheet(summary);
    workbook
}

/// Load a workbook from a JSON file.
///
/// # Errors
///
/// Fails on unsafe paths, unreadable files, or malformed JSON.
pub fn load_workbook(path: &Path) -> Result<Workbook> {
    checked_path(path)?;
    let data = fs::read(path).map_err(|source| BudgetError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&data)?)
}

/// Save a workbook to a JSON file, atomically.
pub fn save_workbook(path: &Path, workbook: &Workbook) -> Result<()> {
    checked_path(path)?;
    let data = serde_json::to_vec_pretty(workbook)?;
    atomic_write(path, &data)
}

/// Atomically write `data` to `path` via a temp file and rename.
/// Best-effort fsync is attempted where available to reduce corruption on
/// crash.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| BudgetError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };

    // Unique temp name in the same directory so the rename stays atomic.
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp = parent.join(format!(".{}.{}.tmp", std::process::id(), nanos));

    let file = File::create(&tmp).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(data).map_err(write_err)?;
    writer.flush().map_err(write_err)?;
    let _ = writer.get_ref().sync_all();

    fs::rename(&tmp, path).map_err(write_err)?;

    // Sync the parent directory to make the rename durable on Unix.
    #[cfg(unix)]
    {
        if let Ok(dir) = File::open(&parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}
