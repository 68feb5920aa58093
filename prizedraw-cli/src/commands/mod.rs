pub mod config;
pub mod listing;
pub mod render;
pub mod simulate;
pub mod spin;

pub use config::{handle_config_command, ConfigCommands};
pub use listing::{handle_list_command, ListArgs};
pub use simulate::{handle_simulate_command, SimulateArgs};
pub use spin::{handle_spin_command, SpinArgs};

use crate::config::CliConfig;
use prizedraw_core::{ListingFormat, LoadReport, PrizeError, Result};
use std::path::{Path, PathBuf};

/// Listing given on the command line, else the configured default.
fn listing_path(listing: Option<PathBuf>, config: &CliConfig) -> PathBuf {
    listing.unwrap_or_else(|| config.default_listing.clone())
}

async fn load_listing(path: &Path, format: Option<ListingFormat>) -> Result<LoadReport> {
    match prizedraw_core::load_file(path, format).await {
        Err(PrizeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Err(PrizeError::Io(
            std::io::Error::new(e.kind(), format!("listing not found: {}", path.display())),
        )),
        other => other,
    }
}

fn prompt_error(err: dialoguer::Error) -> PrizeError {
    PrizeError::internal(format!("Prompt failed: {}", err))
}
