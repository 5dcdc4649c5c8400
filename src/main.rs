//! monobuild command line tool
//!
//! Loads the task configuration of a monorepo: include files, application
//! configs and the tasks they define.

use anyhow::Result;
use clap::Parser;
use monobuild::cli::check::run_check;
use monobuild::cli::init::run_init;
use monobuild::cli::show::run_show;
use monobuild::cli::{Cli, Command};
use monobuild::config::SettingsPaths;
use monobuild::logging;
use monobuild::repository::Repository;
use std::path::Path;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log, cli.verbose)?;

    let cwd = std::env::current_dir()?;

    match &cli.command {
        Command::Init(command) => {
            for path in run_init(command, &cwd)? {
                println!("Wrote {}", path.display());
            }
        }
        Command::Check(args) => {
            let repo = open_repository(&cli, &cwd)?;
            if !run_check(&repo, args).await? {
                std::process::exit(1);
            }
        }
        Command::Show(args) => {
            let repo = open_repository(&cli, &cwd)?;
            print!("{}", run_show(&repo, args).await?);
        }
    }

    Ok(())
}

/// Open the repository containing `cwd`, honoring `--config`.
fn open_repository(cli: &Cli, cwd: &Path) -> Result<Repository> {
    let mut paths = SettingsPaths::discover(cwd)?;

    // An explicit --config wins over MONOBUILD_CONFIG_PATH
    if let Some(config_path) = &cli.config {
        paths.explicit_file = Some(cwd.join(config_path));
    }

    debug!(paths = ?paths, "discovered settings paths");
    Repository::find_with_paths(paths)
}
