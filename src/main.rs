// src/main.rs
use std::process::ExitCode;

use clap::Parser;

use budgetinator::args::Args;
use budgetinator::commands;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match commands::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
