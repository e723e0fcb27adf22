use anyhow::{Context, Result};
use clap::Args;

use crate::domain::models::Config;
use crate::infrastructure::drive::DriveClient;
use crate::infrastructure::retry::RetryPolicy;

#[derive(Args)]
pub struct ResolveArgs {
    /// Slash-delimited path, e.g. /Work/Reports
    pub path: String,
}

/// Handle the resolve command
pub async fn execute(args: ResolveArgs, config: &Config, json: bool) -> Result<()> {
    let drive = DriveClient::new(&config.drive, RetryPolicy::from_config(&config.retry))?;

    let item = drive
        .item_by_path(&args.path)
        .await
        .with_context(|| format!("Failed to resolve {}", args.path))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        println!("{}  {}", item.id, item.name);
    }

    Ok(())
}
