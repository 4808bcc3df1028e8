// crates/core/src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Root error type shared across the workspace.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Adds human context while preserving original error as the source.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<BudgetError>,
    },

    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    #[error("Sheet '{0}' already exists")]
    DuplicateSheet(String),

    #[error("Partner {0} not found")]
    PartnerNotFound(u16),

    #[error("Partner {0} already exists")]
    DuplicatePartner(u16),

    #[error("Work package '{0}' not found")]
    WorkPackageNotFound(String),

    #[error("Work package '{0}' already exists")]
    DuplicateWorkPackage(String),

    #[error("Malformed row {row} in sheet '{sheet}': {reason}")]
    MalformedRow {
        sheet: String,
        row: usize,
        reason: String,
    },

    #[error("No schema version recorded in sheet '{0}'")]
    MissingSchemaVersion(String),

    #[error("Unsafe path '{path}': {reason}")]
    UnsafePath { path: PathBuf, reason: String },

    #[error("No backups found for '{0}'")]
    NoBackups(PathBuf),

    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BudgetError>;

/// Extension trait to add additional context to results.
pub trait ErrorContext<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<BudgetError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| BudgetError::Context {
            context: context.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| BudgetError::Context {
            context: f(),
            source: Box::new(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_and_displays() {
        let err: Result<()> = Err(BudgetError::SheetNotFound("Summary".into()));
        let wrapped = err.context("loading workbook");
        let msg = wrapped.unwrap_err().to_string();
        assert_eq!(msg, "loading workbook: Sheet 'Summary' not found");
    }

    #[test]
    fn with_context_is_lazy() {
        let ok: Result<u32> = Ok(7);
        let value = ok.with_context(|| unreachable!()).unwrap();
        assert_eq!(value, 7);
    }
}
