use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::application::TraversalController;
use crate::cli::output;
use crate::domain::models::{Config, SearchRequest};
use crate::infrastructure::convert::ConversionDispatcher;
use crate::infrastructure::drive::DriveClient;
use crate::infrastructure::oracle::LlmOracle;
use crate::infrastructure::retry::RetryPolicy;

#[derive(Args)]
pub struct SearchArgs {
    /// Free-text description of the file to find
    pub query: String,

    /// Hint text describing how the drive is organized
    #[arg(long)]
    pub drive_description: Option<String>,

    /// Start the traversal at this item id instead of the drive root
    #[arg(long, conflicts_with = "start_path")]
    pub start_id: Option<String>,

    /// Start the traversal at this path instead of the drive root
    #[arg(long)]
    pub start_path: Option<String>,

    /// Verification attempt budget (defaults to traversal.max_attempts)
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Bound on descend steps (defaults to traversal.max_depth)
    #[arg(long)]
    pub max_depth: Option<u32>,
}

/// Handle the search command
pub async fn execute(args: SearchArgs, config: &Config, json: bool) -> Result<()> {
    let retry = RetryPolicy::from_config(&config.retry);
    let drive = Arc::new(DriveClient::new(&config.drive, retry.clone())?);
    let oracle = Arc::new(LlmOracle::new(&config.oracle, retry)?);
    let converter = Arc::new(ConversionDispatcher::new(&config.converter)?);

    let controller =
        TraversalController::new(drive, oracle.clone(), oracle, converter);

    let mut request = SearchRequest::new(args.query)
        .with_max_attempts(args.max_attempts.unwrap_or(config.traversal.max_attempts))
        .with_max_depth(args.max_depth.unwrap_or(config.traversal.max_depth));
    if let Some(description) = args.drive_description {
        request = request.with_drive_description(description);
    }
    if let Some(id) = args.start_id {
        request = request.with_start_node_id(id);
    }
    if let Some(path) = args.start_path {
        request = request.with_start_path(path);
    }

    let run_id = Uuid::new_v4();
    let report = controller
        .run(request)
        .instrument(info_span!("search", %run_id))
        .await
        .context("Search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", output::outcome_line(&report));
        if let Some(file) = &report.file {
            if let Some(relevance) = &file.relevance {
                println!(
                    "  Relevance: {} ({})",
                    relevance.score, relevance.reason
                );
            }
        }
        println!("  Attempts used: {}", report.attempts_used);
        println!("  Finished at: {}", chrono::Utc::now().to_rfc3339());
        if !report.decision_trace.is_empty() {
            println!("\nDecision trace:");
            println!("{}", output::format_trace_table(&report));
        }
        if !report.rejected_paths.is_empty() {
            println!("\nRejected files:");
            println!("{}", output::format_rejections_table(&report));
        }
    }

    Ok(())
}
