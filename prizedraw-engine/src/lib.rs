//! Draw engine for the prizedraw spinner
//!
//! A session spins through random display names on the caller's timer and,
//! when stopped, picks a winner weighted by remaining quantity and takes one
//! unit of it out of stock.

pub mod engine;
pub mod error;
pub mod history;
pub mod observer;
pub mod sampler;
pub mod session;

pub use engine::{DrawEngine, DrawOutcome, EngineState, Toggle};
pub use error::{EngineError, Result};
pub use history::{DrawHistory, DrawRecord};
pub use observer::DrawObserver;
pub use session::{SessionRegistry, SharedEngine};

use prizedraw_core::{DrawConfig, Inventory, LoadReport};

/// Start a session from a loaded listing, attaching `observer` before the
/// listing is installed so it sees the load.
pub fn open_session(
    report: LoadReport,
    config: &DrawConfig,
    observer: Option<Box<dyn DrawObserver>>,
) -> DrawEngine {
    let mut engine = DrawEngine::with_config(Inventory::new(), config);
    if let Some(observer) = observer {
        engine.subscribe(observer);
    }
    engine.reload(report);
    engine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::testing::{Event, EventLog};
    use prizedraw_core::{load, ListingFormat};

    #[test]
    fn test_open_session_reports_load() {
        let log = EventLog::default();
        let report = load("Gift,2\nPen,1\n", ListingFormat::Legacy).unwrap();

        let engine = open_session(report, &DrawConfig::new(), Some(Box::new(log.clone())));

        assert_eq!(engine.inventory().total_remaining(), 3);
        assert_eq!(
            log.events()[0],
            Event::Loaded {
                entries: 2,
                errors: 0
            }
        );
    }
}
