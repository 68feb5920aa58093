use comfy_table::{presets::UTF8_FULL, Table};
use prizedraw_core::{summarize_warnings, PrizeEntry, RowError};
use prizedraw_engine::{DrawHistory, DrawObserver, DrawOutcome};
use std::io::Write;

/// Width the spinning label is padded to, so shorter names overwrite longer ones.
const LABEL_WIDTH: usize = 32;

pub fn inventory_table(entries: &[PrizeEntry]) -> Table {
    let total: u64 = entries.iter().map(|e| u64::from(e.quantity)).sum();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Prize", "Remaining", "Chance"]);

    for (index, entry) in entries.iter().enumerate() {
        let chance = if total == 0 {
            "-".to_string()
        } else {
            format!("{:.1}%", f64::from(entry.quantity) * 100.0 / total as f64)
        };
        table.add_row(vec![
            (index + 1).to_string(),
            entry.name.clone(),
            entry.quantity.to_string(),
            chance,
        ]);
    }

    table
}

pub fn history_table(history: &DrawHistory) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Time (UTC)", "Prize", "Left"]);

    for record in history.records() {
        table.add_row(vec![
            record.sequence.to_string(),
            record.drawn_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.prize.clone(),
            record.remaining.to_string(),
        ]);
    }

    table
}

/// Terminal presentation of a draw session.
pub struct ConsoleObserver {
    warning_preview: usize,
}

impl ConsoleObserver {
    pub fn new(warning_preview: usize) -> Self {
        Self { warning_preview }
    }
}

impl DrawObserver for ConsoleObserver {
    fn on_load_complete(
        &mut self,
        entries: &[PrizeEntry],
        errors: &[RowError],
        duplicates: &[String],
    ) {
        println!("Loaded {} prize(s)", entries.len());
        if let Some(warnings) = summarize_warnings(errors, duplicates, self.warning_preview) {
            eprintln!("{}", warnings);
        }
        if entries.is_empty() {
            eprintln!("Warning: the prize list is empty!");
        }
    }

    fn on_tick(&mut self, display: &str) {
        print!("\r  >> {:<width$}", display, width = LABEL_WIDTH);
        let _ = std::io::stdout().flush();
    }

    fn on_result(&mut self, outcome: &DrawOutcome) {
        println!("\r{:<width$}", "", width = LABEL_WIDTH + 5);
        match outcome {
            DrawOutcome::Win { prize, remaining } => {
                println!("Congratulations! You won: {}", prize);
                println!("({} left of this prize)", remaining);
            }
            DrawOutcome::Exhausted => {
                println!("All prizes have been drawn!");
            }
        }
    }

    fn on_inventory_changed(&mut self, entries: &[PrizeEntry]) {
        println!("{}", inventory_table(entries));
    }
}
