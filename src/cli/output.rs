//! Table rendering for listings and search reports.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use console::style;

use crate::domain::models::{RawItem, SearchOutcome, SearchReport};

/// Render a drive listing as a table.
pub fn format_listing_table(items: &[RawItem]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Kind", "Content type", "Id"]);

    for item in items {
        table.add_row(vec![
            Cell::new(&item.name),
            Cell::new(if item.is_folder { "folder" } else { "file" }),
            Cell::new(item.content_type.as_deref().unwrap_or("-")),
            Cell::new(&item.id),
        ]);
    }
    table.to_string()
}

/// Render the decision trace of a finished run.
pub fn format_trace_table(report: &SearchReport) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Attempt", "Depth", "Chose", "Kind", "Reason"]);

    for (index, step) in report.decision_trace.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(step.attempt),
            Cell::new(step.depth),
            Cell::new(&step.chosen_name),
            Cell::new(step.chosen_kind),
            Cell::new(&step.reason),
        ]);
    }
    table.to_string()
}

/// Render the rejection log of a finished run.
pub fn format_rejections_table(report: &SearchReport) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Path", "Reason"]);

    for rejection in &report.rejected_paths {
        table.add_row(vec![
            Cell::new(&rejection.path),
            Cell::new(&rejection.rejection_reason),
        ]);
    }
    table.to_string()
}

/// One-line status summary for a finished run.
pub fn outcome_line(report: &SearchReport) -> String {
    match report.outcome {
        SearchOutcome::Matched => {
            let file = report.file.as_ref();
            format!(
                "{} {}",
                style("Match:").green().bold(),
                file.map(|f| f.path.as_str()).unwrap_or("?")
            )
        }
        SearchOutcome::Exhausted => format!(
            "{} attempt budget exhausted after {} attempts",
            style("No match:").yellow().bold(),
            report.attempts_used.saturating_sub(1)
        ),
        SearchOutcome::DeadEnd => format!(
            "{} search hit a dead end",
            style("No match:").yellow().bold()
        ),
        SearchOutcome::Stopped => format!(
            "{} oracle found nothing relevant",
            style("No match:").yellow().bold()
        ),
        SearchOutcome::OracleFailed => format!(
            "{} oracle returned no usable decision",
            style("Failed:").red().bold()
        ),
    }
}
