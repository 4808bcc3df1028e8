// src/args.rs
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "budgetinator",
    version = VERSION,
    about = "Editor and schema migrator for structured project budget workbooks"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new workbook file
    Init {
        /// Workbook file to create
        file: PathBuf,
    },

    /// Print the application and schema version
    Version,

    /// Upgrade a workbook's summary sheet to a target schema
    Upgrade {
        /// Workbook file to upgrade
        file: PathBuf,

        /// Target schema version (defaults to the schema this build expects)
        #[arg(long)]
        to: Option<String>,
    },

    /// Manage project partners
    #[command(subcommand)]
    Partner(PartnerCommand),

    /// Manage work packages
    #[command(subcommand)]
    Wp(WpCommand),

    /// Manage workbook backups
    #[command(subcommand)]
    Backup(BackupCommand),
}

#[derive(Subcommand, Debug)]
pub enum PartnerCommand {
    /// Add a partner (partner numbers 2-20; 1 is the coordinator)
    Add {
        /// Workbook file
        file: PathBuf,

        /// Partner number
        #[arg(long)]
        number: u16,

        /// Short acronym, e.g. ACME
        #[arg(long)]
        acronym: String,

        /// Full organisation name
        #[arg(long)]
        name: String,

        /// Country code
        #[arg(long, default_value = "")]
        country: String,

        /// Personnel costs
        #[arg(long, default_value_t = 0.0)]
        personnel: f64,

        /// Equipment costs
        #[arg(long, default_value_t = 0.0)]
        equipment: f64,

        /// Travel costs
        #[arg(long, default_value_t = 0.0)]
        travel: f64,

        /// Subcontracting costs
        #[arg(long, default_value_t = 0.0)]
        subcontracting: f64,

        /// Other direct costs
        #[arg(long, default_value_t = 0.0)]
        other: f64,
    },

    /// Replace a partner's record, keyed by partner number
    Update {
        /// Workbook file
        file: PathBuf,

        /// Partner number
        #[arg(long)]
        number: u16,

        /// Short acronym, e.g. ACME
        #[arg(long)]
        acronym: String,

        /// Full organisation name
        #[arg(long)]
        name: String,

        /// Country code
        #[arg(long, default_value = "")]
        country: String,

        /// Personnel costs
        #[arg(long, default_value_t = 0.0)]
        personnel: f64,

        /// Equipment costs
        #[arg(long, default_value_t = 0.0)]
        equipment: f64,

        /// Travel costs
        #[arg(long, default_value_t = 0.0)]
        travel: f64,

        /// Subcontracting costs
        #[arg(long, default_value_t = 0.0)]
        subcontracting: f64,

        /// Other direct costs
        #[arg(long, default_value_t = 0.0)]
        other: f64,
    },

    /// List partners
    List {
        /// Workbook file
        file: PathBuf,

        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Remove a partner
    Remove {
        /// Workbook file
        file: PathBuf,

        /// Partner number
        #[arg(long)]
        number: u16,
    },
}

#[derive(Subcommand, Debug)]
pub enum WpCommand {
    /// Add a work package
    Add {
        /// Workbook file
        file: PathBuf,

        /// Work package id, e.g. WP1
        #[arg(long)]
        id: String,

        /// Title
        #[arg(long)]
        title: String,

        /// Lead partner number
        #[arg(long)]
        lead: u16,

        /// Start month (from 1)
        #[arg(long)]
        start: u32,

        /// End month (inclusive)
        #[arg(long)]
        end: u32,

        /// Person months
        #[arg(long, default_value_t = 0.0)]
        pm: f64,
    },

    /// Replace a work package's row, keyed by id
    Update {
        /// Workbook file
        file: PathBuf,

        /// Work package id, e.g. WP1
        #[arg(long)]
        id: String,

        /// Title
        #[arg(long)]
        title: String,

        /// Lead partner number
        #[arg(long)]
        lead: u16,

        /// Start month (from 1)
        #[arg(long)]
        start: u32,

        /// End month (inclusive)
        #[arg(long)]
        end: u32,

        /// Person months
        #[arg(long, default_value_t = 0.0)]
        pm: f64,
    },

    /// List work packages
    List {
        /// Workbook file
        file: PathBuf,

        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Remove a work package
    Remove {
        /// Workbook file
        file: PathBuf,

        /// Work package id
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BackupCommand {
    /// Create a timestamped backup of the workbook file
    Create {
        /// Workbook file
        file: PathBuf,

        /// Backup directory (defaults to `backups/` next to the file)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// How many backups to keep per file
        #[arg(long, default_value_t = budgetinator_core::backup::DEFAULT_RETENTION)]
        keep: usize,
    },

    /// List backups of the workbook file, newest first
    List {
        /// Workbook file
        file: PathBuf,

        /// Backup directory (defaults to `backups/` next to the file)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Restore the workbook file from its most recent backup
    Restore {
        /// Workbook file
        file: PathBuf,

        /// Backup directory (defaults to `backups/` next to the file)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}
