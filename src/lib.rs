// src/lib.rs
pub mod args;
pub mod commands;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
