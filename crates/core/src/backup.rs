// crates/core/src/backup.rs
//! Timestamped backups of workbook files.
//!
//! Backups are plain copies named `{stem}_{YYYYMMDD_HHMMSS}.{ext}` in a
//! backup directory. The timestamp format sorts lexicographically, so
//! "newest first" is a reverse name sort. Retention keeps the newest N
//! copies per source file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{BudgetError, Result};
use crate::storage::atomic_write;
use crate::validation::checked_path;

pub const DEFAULT_RETENTION: usize = 10;

pub struct BackupManager {
    backup_dir: PathBuf,
    retention: usize,
}

impl BackupManager {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            retention: DEFAULT_RETENTION,
        }
    }

    #[must_use]
    pub fn with_retention(mut self, retention: usize) -> Self {
        // Retention of zero would delete the backup just taken.
        self.retention = retention.max(1);
        self
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copy `source` into the backup directory, then prune old copies.
    ///
    /// Returns the path of the new backup.
    pub fn create(&self, source: &Path) -> Result<PathBuf> {
        checked_path(source)?;
        let data = fs::read(source).map_err(|e| BudgetError::FileRead {
            path: source.to_path_buf(),
            source: e,
        })?;
        fs::create_dir_all(&self.backup_dir).map_err(|e| BudgetError::FileWrite {
            path: self.backup_dir.clone(),
            source: e,
        })?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let stem = file_stem(source);
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bak");
        let mut dest = self.backup_dir.join(format!("{stem}_{stamp}.{ext}"));
        // Two backups within one second collide on the name.
        let mut counter = 1;
        while dest.exists() {
            dest = self
                .backup_dir
                .join(format!("{stem}_{stamp}_{counter}.{ext}"));
            counter += 1;
        }

        atomic_write(&dest, &data)?;
        log::info!("backed up {} to {}", source.display(), dest.display());
        self.prune(source)?;
        Ok(dest)
    }

    /// Backups for `source`, newest first.
    pub fn list(&self, source: &Path) -> Result<Vec<PathBuf>> {
        let prefix = format!("{}_", file_stem(source));
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            // No directory yet means no backups yet.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(BudgetError::FileRead {
                    path: self.backup_dir.clone(),
                    source: e,
                });
            }
        };
        let mut backups: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();
        backups.sort();
        backups.reverse();
        Ok(backups)
    }

    /// Overwrite `source` with its most recent backup.
    ///
    /// Returns the backup that was restored.
    ///
    /// # Errors
    ///
    /// Fails when no backup exists for `source`.
    pub fn restore_latest(&self, source: &Path) -> Result<PathBuf> {
        let latest = self
            .list(source)?
            .into_iter()
            .next()
            .ok_or_else(|| BudgetError::NoBackups(source.to_path_buf()))?;
        self.restore_from(&latest, source)?;
        Ok(latest)
    }

    /// Overwrite `dest` with the contents of a specific backup file.
    pub fn restore_from(&self, backup: &Path, dest: &Path) -> Result<()> {
        checked_path(dest)?;
        let data = fs::read(backup).map_err(|e| BudgetError::FileRead {
            path: backup.to_path_buf(),
            source: e,
        })?;
        atomic_write(dest, &data)?;
        log::info!("restored {} from {}", dest.display(), backup.display());
        Ok(())
    }

    /// Delete backups of `source` beyond the retention count, oldest first.
    fn prune(&self, source: &Path) -> Result<()> {
        let backups = self.list(source)?;
        for stale in backups.iter().skip(self.retention) {
            fs::remove_file(stale).map_err(|e| BudgetError::FileWrite {
                path: stale.clone(),
                source: e,
            })?;
            log::debug!("pruned old backup {}", stale.display());
        }
        Ok(())
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("workbook")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_copies_contents() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("project.json");
        fs::write(&source, b"{\"sheets\":[]}").unwrap();

        let manager = BackupManager::new(dir.path().join("backups"));
        let backup = manager.create(&source).unwrap();
        assert_eq!(fs::read(&backup).unwrap(), fs::read(&source).unwrap());
        assert!(backup.file_name().unwrap().to_str().unwrap().starts_with("project_"));
    }

    #[test]
    fn list_is_empty_without_backup_dir() {
        let dir = tempfile::tempdir().unwrap();
        let manager = BackupManager::new(dir.path().join("backups"));
        assert!(manager.list(Path::new("project.json")).unwrap().is_empty());
    }

    #[test]
    fn same_second_backups_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("project.json");
        fs::write(&source, b"one").unwrap();

        let manager = BackupManager::new(dir.path().join("backups"));
        let first = manager.create(&source).unwrap();
        let second = manager.create(&source).unwrap();
        assert_ne!(first, second);
        assert_eq!(manager.list(&source).unwrap().len(), 2);
    }

    #[test]
    fn restore_latest_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("project.json");
        fs::write(&source, b"original").unwrap();

        let manager = BackupManager::new(dir.path().join("backups"));
        manager.create(&source).unwrap();
        fs::write(&source, b"mangled").unwrap();

        manager.restore_latest(&source).unwrap();
        assert_eq!(fs::read(&source).unwrap(), b"original");
    }

    #[test]
    fn restore_without_backups_errors() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("project.json");
        let manager = BackupManager::new(dir.path().join("backups"));
        let err = manager.restore_latest(&source).unwrap_err();
        assert!(matches!(err, BudgetError::NoBackups(_)));
    }

    #[test]
    fn prune_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("project.json");
        fs::write(&source, b"data").unwrap();

        let manager = BackupManager::new(dir.path().join("backups")).with_retention(2);
        for _ in 0..4 {
            manager.create(&source).unwrap();
        }
        assert_eq!(manager.list(&source).unwrap().len(), 2);
    }
}
