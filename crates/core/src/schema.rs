// crates/core/src/schema.rs
//! Schema-version tracking and workbook migrations.
//!
//! A workbook records the schema version it was written in on its summary
//! sheet, as a labeled row: the first cell of some row holds the literal
//! [`SCHEMA_VERSION_LABEL`] and the adjacent cell holds the version token.
//! The [`UpgradeRegistry`] maps an exact `(from, to)` pair to the transform
//! that rewrites a sheet from one version to the other. Migrations are not
//! composed transitively; only exact pair matches apply.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, Result};
use crate::sheet::{CellValue, Sheet};
use crate::version::VersionInfo;

/// Label of the row carrying the recorded schema version.
pub const SCHEMA_VERSION_LABEL: &str = "Schema_Version";

/// Opaque schema identifier such as `"v1"`. Compared by exact equality
/// only; no ordering is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(String);

impl SchemaVersion {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchemaVersion {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// A single migration step. Mutates the sheet in place; failures propagate
/// to the caller unmodified, the registry adds no containment.
pub type Transform = fn(&mut Sheet) -> Result<()>;

/// Structured outcome of an upgrade attempt.
///
/// The registry never errors on a missing pair; absence is a normal
/// outcome. The outcome separates "already at the target" from "pair
/// genuinely unknown", which the message string alone does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    Upgraded,
    AlreadyCurrent,
    NoPathFound,
}

/// Outcome plus the human-readable status line for logging/display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeReport {
    pub outcome: UpgradeOutcome,
    pub message: String,
}

impl UpgradeReport {
    pub fn upgraded(&self) -> bool {
        self.outcome == UpgradeOutcome::Upgraded
    }
}

/// Registry of migration transforms keyed by `(from, to)` pairs.
/// Populated once at startup, read-only thereafter.
pub struct UpgradeRegistry {
    transforms: HashMap<(SchemaVersion, SchemaVersion), Transform>,
}

impl UpgradeRegistry {
    /// An empty registry, for tests and embedders bringing their own steps.
    pub fn empty() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// The registry with all transforms known to this build.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("v1".into(), "v2".into(), upgrade_v1_to_v2);
        registry
    }

    pub fn register(&mut self, from: SchemaVersion, to: SchemaVersion, transform: Transform) {
        self.transforms.insert((from, to), transform);
    }

    pub fn contains(&self, from: &SchemaVersion, to: &SchemaVersion) -> bool {
        self.transforms
            .contains_key(&(from.clone(), to.clone()))
    }

    /// Bring `sheet` from `from` to `to` if a transform is registered for
    /// that exact pair.
    ///
    /// With no registered pair the sheet is left untouched and the report
    /// carries `AlreadyCurrent` (when `from == to`) or `NoPathFound`; both
    /// keep the "No upgrade path" message callers log today.
    ///
    /// # Errors
    ///
    /// Only a failing transform errors; a missing pair does not.
    pub fn apply(
        &self,
        sheet: &mut Sheet,
        from: &SchemaVersion,
        to: &SchemaVersion,
    ) -> Result<UpgradeReport> {
        match self.transforms.get(&(from.clone(), to.clone())) {
            Some(transform) => {
                transform(sheet)?;
                log::info!("upgraded sheet '{}' from {from} to {to}", sheet.name);
                Ok(UpgradeReport {
                    outcome: UpgradeOutcome::Upgraded,
                    message: format!("Schema upgraded: {from} ➜ {to}"),
                })
            }
            None => {
                let outcome = if from == to {
                    UpgradeOutcome::AlreadyCurrent
                } else {
                    UpgradeOutcome::NoPathFound
                };
                Ok(UpgradeReport {
                    outcome,
                    message: format!("No upgrade path from {from} to {to}"),
                })
            }
        }
    }
}

impl Default for UpgradeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Read the version token recorded next to the `Schema_Version` label,
/// or `None` when the sheet carries no such row.
pub fn recorded_version(sheet: &Sheet) -> Option<SchemaVersion> {
    let row = sheet.find_label(SCHEMA_VERSION_LABEL)?;
    sheet
        .cell(row, 1)
        .and_then(CellValue::as_text)
        .map(SchemaVersion::new)
}

/// Bring `sheet` up to the schema this build expects, reading the recorded
/// version from the sheet itself.
///
/// # Errors
///
/// Fails when the sheet records no schema version, or when the registered
/// transform fails.
pub fn ensure_current(
    sheet: &mut Sheet,
    info: &VersionInfo,
    registry: &UpgradeRegistry,
) -> Result<UpgradeReport> {
    let found = recorded_version(sheet)
        .ok_or_else(|| BudgetError::MissingSchemaVersion(sheet.name.clone()))?;
    registry.apply(sheet, &found, info.schema())
}

/// v1 ➜ v2: stamp the recorded version and add the `Data_Hash` row.
///
/// Scans data rows from the second row down, first column only; every row
/// labeled `Schema_Version` gets its adjacent cell set to `"v2"`. The
/// `Data_Hash` row is appended unconditionally, so reapplying the
/// transform doubles it. Existing migrated files rely on that exact
/// behavior, so it stays.
pub fn upgrade_v1_to_v2(sheet: &mut Sheet) -> Result<()> {
    for row in 1..sheet.row_count() {
        if sheet.cell(row, 0).and_then(CellValue::as_text) == Some(SCHEMA_VERSION_LABEL) {
            sheet.set_cell(row, 1, CellValue::text("v2"));
        }
    }
    sheet.append_row(vec![
        CellValue::text("Data_Hash"),
        CellValue::text("Not calculated"),
        CellValue::text("Added in v2"),
    ]);
    Ok(())
}
