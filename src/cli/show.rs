//! Show subcommand: print the resolved config of one app.

use anyhow::Result;
use clap::Args;

use super::FileFormat;
use crate::codec::ConfigFormat;
use crate::repository::Repository;

/// Arguments for the show subcommand
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Application name
    pub name: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = FileFormat::Toml)]
    pub format: FileFormat,
}

/// Render the resolved app called `args.name`.
pub async fn run_show(repo: &Repository, args: &ShowArgs) -> Result<String> {
    let app = repo.app_by_name(&args.name).await?;
    let rendered = ConfigFormat::from(args.format).encode(&app)?;
    Ok(rendered)
}
