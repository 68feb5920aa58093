use super::render::inventory_table;
use super::{listing_path, load_listing};
use crate::config::CliConfig;
use clap::Args;
use prizedraw_core::{ListingFormat, Result};
use std::path::PathBuf;

#[derive(Args)]
pub struct ListArgs {
    /// Prize listing file (defaults to the configured listing)
    pub listing: Option<PathBuf>,
    /// Listing format (legacy, tabular); detected when omitted
    #[arg(short, long)]
    pub format: Option<ListingFormat>,
    /// Print the prizes as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_list_command(args: ListArgs, config: &CliConfig) -> Result<()> {
    let path = listing_path(args.listing, config);
    let report = load_listing(&path, args.format).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(report.inventory.list())?);
    } else {
        println!("Prizes in {} ({} listing):", path.display(), report.format);
        println!("{}", inventory_table(report.inventory.list()));
        println!(
            "Total remaining: {}",
            report.inventory.total_remaining()
        );
    }

    if let Some(warnings) = report.warning_summary(config.draw.warning_preview) {
        eprintln!("{}", warnings);
    }
    if report.inventory.is_empty() {
        eprintln!("Warning: the prize list is empty!");
    }

    Ok(())
}
