//! CLI interface for inistore

pub mod commands;
mod output;
pub mod setup;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inistore")]
#[command(author = "Krakaw")]
#[command(version = "0.1.0")]
#[command(about = "Inspect and edit INI settings files", long_about = None)]
pub struct Cli {
    /// Settings file whose [logging] section configures this tool's logger
    #[arg(short, long, global = true, env = "INISTORE_CONFIG", default_value = "inistore.ini")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a settings file with the default [logging] section
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// List every section, key and value of an INI file
    Show {
        /// INI file to read
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print a single value
    Get {
        /// INI file to read
        file: PathBuf,

        /// Section name
        section: String,

        /// Key within the section
        key: String,
    },

    /// Set a single value, creating the file or section if needed
    Set {
        /// INI file to update
        file: PathBuf,

        /// Section name
        section: String,

        /// Key within the section
        key: String,

        /// New value
        value: String,
    },

    /// Verify that a file parses
    Check {
        /// INI file to check
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
