//! prizedraw core - prize inventory and listing loader
//!
//! Holds the data side of a raffle spinner: prize entries with remaining
//! quantities, the loader for both listing formats, and the draw settings
//! shared by the engine and its front ends.

pub mod config;
pub mod error;
pub mod inventory;
pub mod listing;
pub mod types;

pub use config::DrawConfig;
pub use error::{PrizeError, Result, RowError, RowErrorKind};
pub use inventory::Inventory;
pub use listing::{load, load_file, summarize_warnings, ListingFormat, LoadReport};
pub use types::PrizeEntry;
