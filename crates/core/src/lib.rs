// crates/core/src/lib.rs
//! Core library powering the budgetinator CLI: an in-memory workbook
//! model, partner and work-package editing, schema-version migrations,
//! validation, and file backup/restore.

pub mod backup;
pub mod error;
pub mod partner;
pub mod schema;
pub mod sheet;
pub mod storage;
pub mod validation;
pub mod version;
pub mod workpackage;

pub use error::{BudgetError, ErrorContext, Result};
pub use schema::{SchemaVersion, UpgradeOutcome, UpgradeRegistry, UpgradeReport};
pub use sheet::{CellValue, Sheet, Workbook};
pub use version::VersionInfo;
