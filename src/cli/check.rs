//! Check subcommand: load every app config and report the result.

use anyhow::{Result, bail};
use clap::Args;

use crate::format::{OutputFormat, format_check_json, format_check_markdown};
use crate::repository::Repository;

/// Arguments for the check subcommand
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Report format: markdown or json
    #[arg(long, default_value = "markdown")]
    pub format: String,
}

/// Run the check. Returns whether every app config loaded.
pub async fn run_check(repo: &Repository, args: &CheckArgs) -> Result<bool> {
    let Some(format) = OutputFormat::from_str(&args.format) else {
        bail!("Unknown format '{}', expected markdown or json", args.format);
    };

    let results = repo.load_apps().await;
    let ok = results.iter().all(|(_, r)| r.is_ok());

    match format {
        OutputFormat::Markdown => print!("{}", format_check_markdown(&results, repo.root())),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&format_check_json(&results, repo.root()))?
        ),
    }

    Ok(ok)
}
