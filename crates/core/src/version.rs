// crates/core/src/version.rs
//! Application and data-schema version identity.
//!
//! `APP_VERSION` uses the `CARGO_PKG_VERSION` environment variable to
//! automatically stay in sync with the version specified in `Cargo.toml`.

use std::fmt;

use crate::schema::SchemaVersion;

/// Application version derived from Cargo.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema version this build expects of workbook files. Changing it
/// requires a new release together with a registered upgrade transform.
pub const CURRENT_SCHEMA: &str = "v1";

/// Immutable version identity, constructed once at startup and passed
/// explicitly to whatever needs it. No ambient global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    version: String,
    schema: SchemaVersion,
}

impl VersionInfo {
    pub fn new(version: impl Into<String>, schema: SchemaVersion) -> Self {
        Self {
            version: version.into(),
            schema,
        }
    }

    /// The identity of the running build.
    pub fn current() -> Self {
        Self::new(APP_VERSION, SchemaVersion::new(CURRENT_SCHEMA))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn schema(&self) -> &SchemaVersion {
        &self.schema
    }

    /// Composite string for display in diagnostics and `--version` output.
    pub fn full_version_string(&self) -> String {
        format!("App Version {} (Schema: {})", self.version, self.schema)
    }
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_version_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_release_constants() {
        let info = VersionInfo::current();
        assert_eq!(info.version(), "1.0.0");
        assert_eq!(info.schema().as_str(), "v1");
    }

    #[test]
    fn full_version_string_format() {
        let info = VersionInfo::current();
        assert_eq!(info.full_version_string(), "App Version 1.0.0 (Schema: v1)");
    }

    #[test]
    fn alternate_versions_for_testing() {
        let info = VersionInfo::new("2.1.0", SchemaVersion::new("v3"));
        assert_eq!(info.full_version_string(), "App Version 2.1.0 (Schema: v3)");
    }
}
