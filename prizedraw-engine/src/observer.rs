use crate::engine::DrawOutcome;
use prizedraw_core::{PrizeEntry, RowError};

/// Hooks for the presentation layer. Every method has an empty default so an
/// observer only implements what it renders.
pub trait DrawObserver: Send {
    /// A listing was installed. `errors` are the rows that were skipped.
    fn on_load_complete(
        &mut self,
        _entries: &[PrizeEntry],
        _errors: &[RowError],
        _duplicates: &[String],
    ) {
    }

    /// New transient display value while spinning.
    fn on_tick(&mut self, _display: &str) {}

    /// Called once per completed stop.
    fn on_result(&mut self, _outcome: &DrawOutcome) {}

    /// Quantities changed, after a commit or a reload.
    fn on_inventory_changed(&mut self, _entries: &[PrizeEntry]) {}
}
