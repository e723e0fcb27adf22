use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output;
use crate::domain::models::Config;
use crate::infrastructure::drive::DriveClient;
use crate::infrastructure::retry::RetryPolicy;

#[derive(Args)]
pub struct LsArgs {
    /// Folder path to list; the drive root when omitted
    pub path: Option<String>,

    /// Run a server-side name search under the root instead of listing
    #[arg(long, conflicts_with = "path")]
    pub query: Option<String>,
}

/// Handle the ls command
pub async fn execute(args: LsArgs, config: &Config, json: bool) -> Result<()> {
    let drive = DriveClient::new(&config.drive, RetryPolicy::from_config(&config.retry))?;

    let items = if let Some(query) = &args.query {
        drive
            .search(query)
            .await
            .with_context(|| format!("Search for '{query}' failed"))?
    } else if let Some(path) = &args.path {
        let folder = drive
            .item_by_path(path)
            .await
            .with_context(|| format!("Failed to resolve {path}"))?;
        drive
            .item_children(&folder.id)
            .await
            .with_context(|| format!("Failed to list {path}"))?
    } else {
        drive.root_children().await.context("Failed to list root")?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("Empty.");
    } else {
        println!("{}", output::format_listing_table(&items));
        println!("{} item(s)", items.len());
    }

    Ok(())
}
