use super::{listing_path, load_listing};
use crate::config::CliConfig;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use prizedraw_core::{ListingFormat, PrizeEntry, PrizeError};
use prizedraw_engine::{DrawEngine, EngineError, Result, SessionRegistry};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Args)]
pub struct SimulateArgs {
    /// Prize listing file (defaults to the configured listing)
    pub listing: Option<PathBuf>,
    /// Listing format (legacy, tabular); detected when omitted
    #[arg(short, long)]
    pub format: Option<ListingFormat>,
    /// Draws per session; runs until the stock is gone when omitted
    #[arg(short, long)]
    pub draws: Option<usize>,
    /// Number of independent sessions, each with its own copy of the stock
    #[arg(long, default_value = "1")]
    pub sessions: usize,
    /// Base seed; session N uses seed + N
    #[arg(short, long)]
    pub seed: Option<u64>,
}

pub async fn handle_simulate_command(args: SimulateArgs, config: &CliConfig) -> Result<()> {
    if args.sessions == 0 {
        return Err(PrizeError::config("At least one session is required").into());
    }

    let path = listing_path(args.listing, config);
    let report = load_listing(&path, args.format).await?;
    if let Some(warnings) = report.warning_summary(config.draw.warning_preview) {
        eprintln!("{}", warnings);
    }
    let stock = report.inventory;

    let registry = SessionRegistry::new();
    let base_seed = args.seed.or(config.draw.seed);
    let mut ids = Vec::with_capacity(args.sessions);
    for i in 0..args.sessions {
        let mut draw = config.draw.clone();
        draw.seed = base_seed.map(|seed| seed.wrapping_add(i as u64));
        let label = session_label(i, args.sessions);
        ids.push(registry.open(&label, stock.clone(), &draw));
    }

    let mut handles = Vec::with_capacity(ids.len());
    for id in &ids {
        let engine = registry
            .get(*id)
            .ok_or(EngineError::SessionNotFound(*id))?;
        let limit = args.draws;
        handles.push(tokio::task::spawn_blocking(move || {
            let mut engine = engine.lock();
            run_session(&mut engine, limit).map(|_| engine.history().tally())
        }));
    }

    let mut totals: HashMap<String, usize> = HashMap::new();
    let mut drawn_by_session: HashMap<Uuid, usize> = HashMap::new();
    for (id, handle) in ids.iter().zip(handles) {
        let tally = handle
            .await
            .map_err(|e| PrizeError::internal(format!("Simulation task failed: {}", e)))??;

        drawn_by_session.insert(*id, tally.iter().map(|(_, n)| n).sum());
        for (prize, count) in tally {
            *totals.entry(prize).or_insert(0) += count;
        }
    }

    if args.sessions > 1 {
        for (id, label) in registry.list() {
            let drawn = drawn_by_session.get(&id).copied().unwrap_or(0);
            println!("{} ({}): {} draw(s)", label, id, drawn);
        }
    }

    println!("{}", tally_table(stock.list(), &totals));

    for id in ids {
        registry.close(id)?;
    }

    Ok(())
}

/// Drives one session through start, tick and stop until `limit` draws are
/// made or the stock runs out. Returns the number of draws made.
fn run_session(engine: &mut DrawEngine, limit: Option<usize>) -> Result<usize> {
    let mut drawn = 0;
    while limit.map_or(true, |limit| drawn < limit) {
        match engine.request_start() {
            Ok(()) => {}
            Err(EngineError::EmptyPool) => break,
            Err(e) => return Err(e),
        }
        engine.tick()?;
        if engine.request_stop()?.winner().is_some() {
            drawn += 1;
        }
    }

    tracing::debug!("Session {} finished after {} draw(s)", engine.id(), drawn);
    Ok(drawn)
}

/// Zero-padded so labels sort in session order.
fn session_label(index: usize, sessions: usize) -> String {
    let width = sessions.to_string().len();
    format!("session-{:0width$}", index + 1, width = width)
}

fn tally_table(stock: &[PrizeEntry], totals: &HashMap<String, usize>) -> Table {
    let stock_total: u64 = stock.iter().map(|e| u64::from(e.quantity)).sum();
    let drawn_total: usize = totals.values().sum();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Prize", "Stock", "Stock share", "Drawn", "Drawn share"]);

    for entry in stock {
        let drawn = totals.get(&entry.name).copied().unwrap_or(0);
        table.add_row(vec![
            entry.name.clone(),
            entry.quantity.to_string(),
            share(u64::from(entry.quantity), stock_total),
            drawn.to_string(),
            share(drawn as u64, drawn_total as u64),
        ]);
    }

    table
}

fn share(part: u64, whole: u64) -> String {
    if whole == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", part as f64 * 100.0 / whole as f64)
    }
}
