//! Init subcommands: write template settings, app and include files.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use super::FileFormat;
use crate::codec::{self, ConfigFormat};
use crate::config::{REPOSITORY_CONFIG_FILE, Settings};
use crate::model::{example_app, example_include};

/// Directory for include files created by `init repo`.
const DEFAULT_INCLUDE_DIR: &str = "includes";

/// Template file written by `init repo` into the include directory.
const DEFAULT_INCLUDE_FILE: &str = "example.toml";

/// Arguments for the init subcommands
#[derive(Subcommand, Debug)]
pub enum InitCommand {
    /// Create the repository settings file and an include directory
    Repo(InitRepoArgs),

    /// Create an application config
    App(InitAppArgs),

    /// Create an include file
    Include(InitIncludeArgs),
}

#[derive(Args, Debug)]
pub struct InitRepoArgs {
    /// Repository root (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct InitAppArgs {
    /// Application name
    pub name: String,

    /// Application directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// File format of the config
    #[arg(long, value_enum, default_value_t = FileFormat::Toml)]
    pub format: FileFormat,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct InitIncludeArgs {
    /// Include file to create, the extension selects TOML or YAML
    pub file: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Run an init subcommand. Returns the files that were written.
pub fn run_init(command: &InitCommand, cwd: &Path) -> Result<Vec<PathBuf>> {
    match command {
        InitCommand::Repo(args) => init_repo(args, cwd),
        InitCommand::App(args) => init_app(args, cwd).map(|p| vec![p]),
        InitCommand::Include(args) => {
            let path = cwd.join(&args.file);
            write_template(&example_include(), &path, args.force)?;
            Ok(vec![path])
        }
    }
}

fn init_repo(args: &InitRepoArgs, cwd: &Path) -> Result<Vec<PathBuf>> {
    let root = args.dir.as_ref().map(|d| cwd.join(d)).unwrap_or_else(|| cwd.to_path_buf());

    let mut settings = Settings::default();
    settings.includes.dirs = vec![PathBuf::from(DEFAULT_INCLUDE_DIR)];

    let settings_file = root.join(REPOSITORY_CONFIG_FILE);
    write_template(&settings, &settings_file, args.force)?;

    let include_dir = root.join(DEFAULT_INCLUDE_DIR);
    std::fs::create_dir_all(&include_dir)
        .with_context(|| format!("Failed to create {}", include_dir.display()))?;

    let include_file = include_dir.join(DEFAULT_INCLUDE_FILE);
    write_template(&example_include(), &include_file, args.force)?;

    Ok(vec![settings_file, include_file])
}

fn init_app(args: &InitAppArgs, cwd: &Path) -> Result<PathBuf> {
    let dir = args.dir.as_ref().map(|d| cwd.join(d)).unwrap_or_else(|| cwd.to_path_buf());
    let file_name = match ConfigFormat::from(args.format) {
        ConfigFormat::Toml => ".app.toml",
        ConfigFormat::Yaml => ".app.yaml",
    };

    let path = dir.join(file_name);
    write_template(&example_app(&args.name), &path, args.force)?;
    Ok(path)
}

fn write_template<T: serde::Serialize>(value: &T, path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        bail!("{} already exists, use --force to overwrite it", path.display());
    }

    codec::to_file(value, path, force)?;
    Ok(())
}
