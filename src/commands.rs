// src/commands.rs
//! Subcommand handlers bridging the CLI to the core library.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use budgetinator_core::backup::BackupManager;
use budgetinator_core::partner::{self, BudgetLines, Partner};
use budgetinator_core::schema::recorded_version;
use budgetinator_core::storage::{self, SUMMARY_SHEET};
use budgetinator_core::workpackage::{self, WorkPackage};
use budgetinator_core::{SchemaVersion, UpgradeRegistry, VersionInfo, Workbook};

use crate::args::{Args, BackupCommand, Command, PartnerCommand, WpCommand};

pub fn run(args: Args) -> Result<()> {
    let info = VersionInfo::current();
    match args.command {
        Command::Version => {
            println!("{}", info.full_version_string());
            Ok(())
        }
        Command::Init { file } => init(&file, &info),
        Command::Upgrade { file, to } => upgrade(&file, to, &info),
        Command::Partner(cmd) => run_partner(cmd),
        Command::Wp(cmd) => run_wp(cmd),
        Command::Backup(cmd) => run_backup(cmd),
    }
}

fn load(file: &Path) -> Result<Workbook> {
    let workbook =
        storage::load_workbook(file).with_context(|| format!("loading {}", file.display()))?;
    log::debug!("loaded {} sheet(s) from {}", workbook.sheets().len(), file.display());
    Ok(workbook)
}

fn save(file: &Path, workbook: &Workbook) -> Result<()> {
    storage::save_workbook(file, workbook).with_context(|| format!("saving {}", file.display()))
}

fn init(file: &Path, info: &VersionInfo) -> Result<()> {
    if file.exists() {
        bail!("'{}' already exists", file.display());
    }
    save(file, &storage::new_workbook(info))?;
    println!("Created {}", file.display());
    Ok(())
}

fn upgrade(file: &Path, to: Option<String>, info: &VersionInfo) -> Result<()> {
    let mut workbook = load(file)?;
    let summary = workbook
        .sheet_mut(SUMMARY_SHEET)
        .with_context(|| format!("'{}' has no {SUMMARY_SHEET} sheet", file.display()))?;
    let found = recorded_version(summary)
        .with_context(|| format!("'{}' records no schema version", file.display()))?;
    let target = to.map_or_else(|| info.schema().clone(), SchemaVersion::new);

    let registry = UpgradeRegistry::builtin();
    let report = registry.apply(summary, &found, &target)?;
    println!("{}", report.message);
    if report.upgraded() {
        save(file, &workbook)?;
    }
    Ok(())
}

fn run_partner(cmd: PartnerCommand) -> Result<()> {
    match cmd {
        PartnerCommand::Add {
            file,
            number,
            acronym,
            name,
            country,
            personnel,
            equipment,
            travel,
            subcontracting,
            other,
        } => {
            let record = Partner {
                number,
                acronym,
                name,
                country,
                budget: BudgetLines {
                    personnel,
                    equipment,
                    travel,
                    subcontracting,
                    other,
                },
            };
            let mut workbook = load(&file)?;
            partner::add_partner(&mut workbook, &record)?;
            save(&file, &workbook)?;
            println!("Added partner P{} ({})", record.number, record.acronym);
            Ok(())
        }
        PartnerCommand::Update {
            file,
            number,
            acronym,
            name,
            country,
            personnel,
            equipment,
            travel,
            subcontracting,
            other,
        } => {
            let record = Partner {
                number,
                acronym,
                name,
                country,
                budget: BudgetLines {
                    personnel,
                    equipment,
                    travel,
                    subcontracting,
                    other,
                },
            };
            let mut workbook = load(&file)?;
            partner::update_partner(&mut workbook, &record)?;
            save(&file, &workbook)?;
            println!("Updated partner P{} ({})", record.number, record.acronym);
            Ok(())
        }
        PartnerCommand::List { file, json } => {
            let workbook = load(&file)?;
            let partners = partner::list_partners(&workbook);
            if json {
                println!("{}", serde_json::to_string_pretty(&partners)?);
                return Ok(());
            }
            if partners.is_empty() {
                println!("No partners");
                return Ok(());
            }
            println!("{:>4}  {:<12} {:<32} {:<8} {:>14}", "No.", "Acronym", "Name", "Country", "Total budget");
            for p in partners {
                println!(
                    "{:>4}  {:<12} {:<32} {:<8} {:>14.2}",
                    format!("P{}", p.number),
                    p.acronym,
                    p.name,
                    p.country,
                    p.budget.total()
                );
            }
            Ok(())
        }
        PartnerCommand::Remove { file, number } => {
            let mut workbook = load(&file)?;
            let removed = partner::remove_partner(&mut workbook, number)?;
            save(&file, &workbook)?;
            println!("Removed partner P{} ({})", removed.number, removed.acronym);
            Ok(())
        }
    }
}

fn run_wp(cmd: WpCommand) -> Result<()> {
    match cmd {
        WpCommand::Add {
            file,
            id,
            title,
            lead,
            start,
            end,
            pm,
        } => {
            let record = WorkPackage {
                id,
                title,
                lead_partner: lead,
                start_month: start,
                end_month: end,
                person_months: pm,
            };
            let mut workbook = load(&file)?;
            workpackage::add_workpackage(&mut workbook, &record)?;
            save(&file, &workbook)?;
            println!("Added work package {}", record.id);
            Ok(())
        }
        WpCommand::Update {
            file,
            id,
            title,
            lead,
            start,
            end,
            pm,
        } => {
            let record = WorkPackage {
                id,
                title,
                lead_partner: lead,
                start_month: start,
                end_month: end,
                person_months: pm,
            };
            let mut workbook = load(&file)?;
            workpackage::update_workpackage(&mut workbook, &record)?;
            save(&file, &workbook)?;
            println!("Updated work package {}", record.id);
            Ok(())
        }
        WpCommand::List { file, json } => {
            let workbook = load(&file)?;
            let packages = workpackage::list_workpackages(&workbook)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&packages)?);
                return Ok(());
            }
            if packages.is_empty() {
                println!("No work packages");
                return Ok(());
            }
            println!(
                "{:<6} {:<32} {:>5} {:>6} {:>5} {:>6}",
                "ID", "Title", "Lead", "Start", "End", "PM"
            );
            for wp in packages {
                println!(
                    "{:<6} {:<32} {:>5} {:>6} {:>5} {:>6.1}",
                    wp.id,
                    wp.title,
                    format!("P{}", wp.lead_partner),
                    wp.start_month,
                    wp.end_month,
                    wp.person_months
                );
            }
            Ok(())
        }
        WpCommand::Remove { file, id } => {
            let mut workbook = load(&file)?;
            let removed = workpackage::remove_workpackage(&mut workbook, &id)?;
            save(&file, &workbook)?;
            println!("Removed work package {}", removed.id);
            Ok(())
        }
    }
}

fn backup_manager(file: &Path, dir: Option<PathBuf>) -> BackupManager {
    let dir = dir.unwrap_or_else(|| {
        file.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .join("backups")
    });
    BackupManager::new(dir)
}

fn run_backup(cmd: BackupCommand) -> Result<()> {
    match cmd {
        BackupCommand::Create { file, dir, keep } => {
            let manager = backup_manager(&file, dir).with_retention(keep);
            let backup = manager.create(&file)?;
            println!("Backed up to {}", backup.display());
            Ok(())
        }
        BackupCommand::List { file, dir } => {
            let manager = backup_manager(&file, dir);
            let backups = manager.list(&file)?;
            if backups.is_empty() {
                println!("No backups");
                return Ok(());
            }
            for backup in backups {
                println!("{}", backup.display());
            }
            Ok(())
        }
        BackupCommand::Restore { file, dir } => {
            let manager = backup_manager(&file, dir);
            let restored = manager.restore_latest(&file)?;
            println!("Restored {} from {}", file.display(), restored.display());
            Ok(())
        }
    }
}
