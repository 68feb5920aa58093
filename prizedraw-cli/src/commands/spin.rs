use super::render::{history_table, ConsoleObserver};
use super::{listing_path, load_listing, prompt_error};
use crate::config::CliConfig;
use clap::Args;
use dialoguer::Confirm;
use prizedraw_core::{DrawConfig, ListingFormat, PrizeError};
use prizedraw_engine::{open_session, DrawEngine, EngineError, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Args)]
pub struct SpinArgs {
    /// Prize listing file (defaults to the configured listing)
    pub listing: Option<PathBuf>,
    /// Listing format (legacy, tabular); detected when omitted
    #[arg(short, long)]
    pub format: Option<ListingFormat>,
    /// Stop automatically after this many milliseconds instead of waiting for Enter
    #[arg(short, long)]
    pub auto_stop_ms: Option<u64>,
    /// Milliseconds between display updates while spinning
    #[arg(short, long)]
    pub tick_ms: Option<u64>,
    /// Seed for a reproducible session
    #[arg(short, long)]
    pub seed: Option<u64>,
}

impl SpinArgs {
    fn draw_config(&self, base: &DrawConfig) -> prizedraw_core::Result<DrawConfig> {
        let mut draw = base.clone();
        if let Some(ms) = self.tick_ms {
            draw.tick_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.auto_stop_ms {
            draw.auto_stop = Some(Duration::from_millis(ms));
        }
        if self.seed.is_some() {
            draw.seed = self.seed;
        }
        draw.validate()?;
        Ok(draw)
    }
}

pub async fn handle_spin_command(args: SpinArgs, config: &CliConfig) -> Result<()> {
    let draw = args.draw_config(&config.draw)?;
    let path = listing_path(args.listing, config);
    let report = load_listing(&path, args.format).await?;

    let observer = ConsoleObserver::new(draw.warning_preview);
    let mut engine = open_session(report, &draw, Some(Box::new(observer)));

    loop {
        let start = Confirm::new()
            .with_prompt("Start spinning?")
            .default(true)
            .interact()
            .map_err(prompt_error)?;
        if !start {
            break;
        }

        match engine.toggle() {
            Ok(_) => {}
            Err(EngineError::EmptyPool) => {
                println!("All prizes have been drawn!");
                break;
            }
            Err(e) => return Err(e),
        }

        match draw.auto_stop {
            Some(delay) => spin_for(&mut engine, draw.tick_interval, delay).await?,
            None => {
                println!("Press Enter to stop...");
                spin_until_enter(&mut engine, draw.tick_interval).await?;
            }
        }

        engine.toggle()?;
    }

    if !engine.history().is_empty() {
        println!("Draw history:");
        println!("{}", history_table(engine.history()));
    }

    Ok(())
}

async fn spin_for(engine: &mut DrawEngine, tick: Duration, delay: Duration) -> Result<()> {
    let mut ticker = tokio::time::interval(tick);
    let deadline = tokio::time::sleep(delay);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => return Ok(()),
            _ = ticker.tick() => {
                engine.tick()?;
            }
        }
    }
}

async fn spin_until_enter(engine: &mut DrawEngine, tick: Duration) -> Result<()> {
    let mut ticker = tokio::time::interval(tick);
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut line = String::new();
    let enter = stdin.read_line(&mut line);
    tokio::pin!(enter);

    loop {
        tokio::select! {
            read = &mut enter => {
                read.map_err(PrizeError::from)?;
                return Ok(());
            }
            _ = ticker.tick() => {
                engine.tick()?;
            }
        }
    }
}
