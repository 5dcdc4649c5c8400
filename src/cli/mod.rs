//! CLI command definitions for monobuild
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod check;
pub mod init;
pub mod show;

use check::CheckArgs;
use clap::{Parser, Subcommand, ValueEnum};
use init::InitCommand;
use show::ShowArgs;

use crate::codec::ConfigFormat;

/// File format of written or printed configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FileFormat {
    #[default]
    Toml,
    Yaml,
}

impl From<FileFormat> for ConfigFormat {
    fn from(format: FileFormat) -> Self {
        match format {
            FileFormat::Toml => ConfigFormat::Toml,
            FileFormat::Yaml => ConfigFormat::Yaml,
        }
    }
}

/// Task configuration tool for monorepos
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to settings file (replaces repository and user settings)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create settings, app or include files from templates
    #[command(subcommand)]
    Init(InitCommand),

    /// Load and validate every app config of the repository
    Check(CheckArgs),

    /// Print the resolved config of an app
    Show(ShowArgs),
}
