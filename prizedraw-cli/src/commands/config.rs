use crate::config::CliConfig;
use clap::Subcommand;
use prizedraw_core::{PrizeError, Result};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the active configuration and where it is read from
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_config_command(
    cmd: ConfigCommands,
    config: &CliConfig,
    path: &Path,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let source = if path.exists() { "" } else { " (not found, defaults)" };
            println!("Config file: {}{}", path.display(), source);
            println!("{}", serde_json::to_string_pretty(config)?);
        }

        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                return Err(PrizeError::config(format!(
                    "{} already exists, use --force to overwrite",
                    path.display()
                )));
            }

            CliConfig::default().save(path).await?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
