use crate::history::DrawHistory;
use crate::observer::DrawObserver;
use crate::sampler::{uniform_pick, weighted_pick};
use crate::{EngineError, Result};
use prizedraw_core::{DrawConfig, Inventory, LoadReport, RowError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Idle,
    Spinning,
}

/// Result of a stop request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawOutcome {
    Win { prize: String, remaining: u32 },
    /// Nothing was eligible when the spin stopped. Not an error.
    Exhausted,
}

impl DrawOutcome {
    pub fn winner(&self) -> Option<&str> {
        match self {
            Self::Win { prize, .. } => Some(prize),
            Self::Exhausted => None,
        }
    }
}

/// What a single start/stop button press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    Started,
    Stopped(DrawOutcome),
}

/// Spin/stop state machine over one owned [`Inventory`].
///
/// `tick` only produces throwaway display values. The winner is decided by
/// `request_stop` alone, which is also the only place stock is taken out.
pub struct DrawEngine {
    id: Uuid,
    state: EngineState,
    inventory: Inventory,
    current_display: Option<String>,
    history: DrawHistory,
    rng: StdRng,
    observers: Vec<Box<dyn DrawObserver>>,
}

impl DrawEngine {
    pub fn new(inventory: Inventory) -> Self {
        Self::with_rng(inventory, StdRng::from_entropy())
    }

    /// Seeded from `config.seed` when present, otherwise from entropy.
    pub fn with_config(inventory: Inventory, config: &DrawConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(inventory, seed),
            None => Self::new(inventory),
        }
    }

    pub fn with_seed(inventory: Inventory, seed: u64) -> Self {
        Self::with_rng(inventory, StdRng::seed_from_u64(seed))
    }

    fn with_rng(inventory: Inventory, rng: StdRng) -> Self {
        let engine = Self {
            id: Uuid::new_v4(),
            state: EngineState::Idle,
            inventory,
            current_display: None,
            history: DrawHistory::new(),
            rng,
            observers: Vec::new(),
        };

        tracing::debug!(
            "Draw session {} created with {} prize(s)",
            engine.id,
            engine.inventory.len()
        );
        engine
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state == EngineState::Spinning
    }

    pub fn current_display(&self) -> Option<&str> {
        self.current_display.as_deref()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn history(&self) -> &DrawHistory {
        &self.history
    }

    pub fn subscribe(&mut self, observer: Box<dyn DrawObserver>) {
        self.observers.push(observer);
    }

    /// Idle -> Spinning, provided at least one prize is still in stock.
    pub fn request_start(&mut self) -> Result<()> {
        if self.is_spinning() {
            return Err(EngineError::invalid_state("Already spinning"));
        }

        if !self.inventory.has_available() {
            tracing::warn!("Session {} start refused: prize pool is empty", self.id);
            return Err(EngineError::EmptyPool);
        }

        self.state = EngineState::Spinning;
        tracing::info!("Session {} started spinning", self.id);
        Ok(())
    }

    /// Next display value while spinning, uniform over prizes in stock.
    pub fn tick(&mut self) -> Result<Option<&str>> {
        if !self.is_spinning() {
            return Err(EngineError::invalid_state("Tick requested while idle"));
        }

        let shown = match uniform_pick(&self.inventory, &mut self.rng) {
            Some(entry) => entry.name.clone(),
            None => return Ok(None),
        };

        tracing::debug!("Session {} tick: {}", self.id, shown);
        for observer in self.observers.iter_mut() {
            observer.on_tick(&shown);
        }

        self.current_display = Some(shown);
        Ok(self.current_display.as_deref())
    }

    /// Spinning -> Idle. Draws the winner by weight and takes one unit of it
    /// out of stock. Calling it again without a new start fails.
    pub fn request_stop(&mut self) -> Result<DrawOutcome> {
        if !self.is_spinning() {
            return Err(EngineError::invalid_state("Stop requested while idle"));
        }

        self.state = EngineState::Idle;
        self.current_display = None;

        let winner = weighted_pick(&self.inventory, &mut self.rng).map(|e| e.name.clone());

        let outcome = match winner {
            Some(prize) => {
                let remaining = self.inventory.decrement(&prize).map_err(|e| {
                    tracing::error!("Session {} failed to commit '{}': {}", self.id, prize, e);
                    e
                })?;
                self.history.record(&prize, remaining);

                tracing::info!(
                    "Session {} winner: {} ({} left)",
                    self.id,
                    prize,
                    remaining
                );
                DrawOutcome::Win { prize, remaining }
            }
            None => {
                tracing::warn!("Session {} stopped with nothing left to draw", self.id);
                DrawOutcome::Exhausted
            }
        };

        for observer in self.observers.iter_mut() {
            observer.on_result(&outcome);
        }
        if matches!(outcome, DrawOutcome::Win { .. }) {
            for observer in self.observers.iter_mut() {
                observer.on_inventory_changed(self.inventory.list());
            }
        }

        Ok(outcome)
    }

    /// Single button behaviour: start when idle, stop when spinning.
    pub fn toggle(&mut self) -> Result<Toggle> {
        match self.state {
            EngineState::Idle => self.request_start().map(|_| Toggle::Started),
            EngineState::Spinning => self.request_stop().map(Toggle::Stopped),
        }
    }

    /// Swap in a freshly loaded inventory. Allowed in either state; a spin in
    /// progress keeps going and its stop draws from the new stock.
    pub fn reload(&mut self, report: LoadReport) -> Vec<RowError> {
        let LoadReport {
            inventory,
            errors,
            duplicates,
            ..
        } = report;

        self.inventory = inventory;
        tracing::info!(
            "Session {} loaded {} prize(s), {} in stock",
            self.id,
            self.inventory.len(),
            self.inventory.total_remaining()
        );

        for observer in self.observers.iter_mut() {
            observer.on_load_complete(self.inventory.list(), &errors, &duplicates);
            observer.on_inventory_changed(self.inventory.list());
        }

        errors
    }

    #[cfg(test)]
    pub(crate) fn force_spinning(&mut self) {
        self.state = EngineState::Spinning;
    }
}

impl std::fmt::Debug for DrawEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawEngine")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("inventory", &self.inventory)
            .field("current_display", &self.current_display)
            .field("draws", &self.history.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::testing::{Event, EventLog};
    use prizedraw_core::{load, ListingFormat, PrizeError};

    fn engine(pairs: &[(&str, u32)]) -> DrawEngine {
        DrawEngine::with_seed(Inventory::from_entries(pairs.iter().copied()), 11)
    }

    #[test]
    fn test_start_tick_stop_cycle() {
        let mut engine = engine(&[("Gift", 2), ("Pen", 1)]);
        assert_eq!(engine.state(), EngineState::Idle);

        engine.request_start().unwrap();
        assert!(engine.is_spinning());

        let shown = engine.tick().unwrap().unwrap().to_string();
        assert!(shown == "Gift" || shown == "Pen");
        assert_eq!(engine.current_display(), Some(shown.as_str()));

        let outcome = engine.request_stop().unwrap();
        let winner = outcome.winner().unwrap().to_string();

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.current_display(), None);
        assert_eq!(engine.inventory().total_remaining(), 2);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.history().latest().unwrap().prize, winner);
    }

    #[test]
    fn test_sum_drops_by_one_per_win() {
        let mut engine = engine(&[("A", 3), ("B", 2), ("C", 0)]);

        let mut expected = engine.inventory().total_remaining();
        while engine.request_start().is_ok() {
            for _ in 0..5 {
                engine.tick().unwrap();
            }
            let outcome = engine.request_stop().unwrap();
            assert!(matches!(outcome, DrawOutcome::Win { .. }));

            expected -= 1;
            assert_eq!(engine.inventory().total_remaining(), expected);
        }

        assert_eq!(expected, 0);
        assert_eq!(engine.history().len(), 5);
        assert_eq!(
            engine.history().tally().iter().map(|(_, n)| n).sum::<usize>(),
            5
        );
    }

    #[test]
    fn test_depletion_is_terminal() {
        let mut engine = engine(&[("A", 1)]);
        engine.request_start().unwrap();
        engine.request_stop().unwrap();

        assert!(matches!(engine.request_start(), Err(EngineError::EmptyPool)));
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(matches!(engine.tick(), Err(EngineError::InvalidState(_))));
        assert!(matches!(
            engine.request_stop(),
            Err(EngineError::InvalidState(_))
        ));
        assert_eq!(engine.inventory().get("A").unwrap().quantity, 0);
    }

    #[test]
    fn test_second_stop_is_rejected() {
        let mut engine = engine(&[("A", 5)]);
        engine.request_start().unwrap();

        assert_eq!(
            engine.request_stop().unwrap(),
            DrawOutcome::Win {
                prize: "A".to_string(),
                remaining: 4
            }
        );
        assert!(matches!(
            engine.request_stop(),
            Err(EngineError::InvalidState(_))
        ));
        assert_eq!(engine.inventory().get("A").unwrap().quantity, 4);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_exhausted_when_forced_spinning() {
        let mut engine = engine(&[("A", 0), ("B", 0)]);

        assert!(matches!(engine.request_start(), Err(EngineError::EmptyPool)));
        assert_eq!(engine.state(), EngineState::Idle);

        engine.force_spinning();
        assert_eq!(engine.tick().unwrap(), None);
        assert_eq!(engine.request_stop().unwrap(), DrawOutcome::Exhausted);

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.inventory().total_remaining(), 0);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_start_while_spinning_is_rejected() {
        let mut engine = engine(&[("A", 1)]);
        engine.request_start().unwrap();

        assert!(matches!(
            engine.request_start(),
            Err(EngineError::InvalidState(_))
        ));
        assert!(engine.is_spinning());
    }

    #[test]
    fn test_tick_never_commits() {
        let mut engine = engine(&[("A", 1), ("B", 1)]);
        engine.request_start().unwrap();

        for _ in 0..100 {
            engine.tick().unwrap();
        }
        assert_eq!(engine.inventory().total_remaining(), 2);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_ticks_only_show_prizes_in_stock() {
        let mut engine = engine(&[("A", 0), ("B", 3), ("C", 0)]);
        engine.request_start().unwrap();

        for _ in 0..50 {
            assert_eq!(engine.tick().unwrap(), Some("B"));
        }
    }

    #[test]
    fn test_toggle() {
        let mut engine = engine(&[("A", 1)]);

        assert_eq!(engine.toggle().unwrap(), Toggle::Started);
        assert_eq!(
            engine.toggle().unwrap(),
            Toggle::Stopped(DrawOutcome::Win {
                prize: "A".to_string(),
                remaining: 0
            })
        );
        assert!(matches!(engine.toggle(), Err(EngineError::EmptyPool)));
    }

    #[test]
    fn test_reload_while_spinning_onto_depleted_listing() {
        let mut engine = engine(&[("A", 2)]);
        engine.request_start().unwrap();

        let report = load("A,0\nB,0\n", ListingFormat::Legacy).unwrap();
        let errors = engine.reload(report);
        assert!(errors.is_empty());
        assert!(engine.is_spinning());

        assert_eq!(engine.request_stop().unwrap(), DrawOutcome::Exhausted);
        assert_eq!(engine.inventory().len(), 2);
        assert_eq!(engine.inventory().total_remaining(), 0);
    }

    #[test]
    fn test_reload_returns_row_errors() {
        let mut engine = DrawEngine::new(Inventory::new());
        assert!(matches!(engine.request_start(), Err(EngineError::EmptyPool)));

        let report = load(
            "name,quantity\nGift,5\nBadRow\nPen,3\n",
            ListingFormat::Tabular,
        )
        .unwrap();
        let errors = engine.reload(report);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 3);
        assert_eq!(engine.inventory().total_remaining(), 8);
        assert!(engine.request_start().is_ok());
    }

    #[test]
    fn test_observers_receive_events() {
        let log = EventLog::default();
        let mut engine = DrawEngine::with_seed(Inventory::new(), 5);
        engine.subscribe(Box::new(log.clone()));

        let report = load("name,quantity\nA,1\nBad,x\n", ListingFormat::Tabular).unwrap();
        engine.reload(report);

        engine.request_start().unwrap();
        engine.tick().unwrap();
        engine.request_stop().unwrap();

        engine.force_spinning();
        engine.request_stop().unwrap();

        assert_eq!(
            log.events(),
            vec![
                Event::Loaded {
                    entries: 1,
                    errors: 1
                },
                Event::InventoryChanged(1),
                Event::Tick("A".to_string()),
                Event::Result(DrawOutcome::Win {
                    prize: "A".to_string(),
                    remaining: 0
                }),
                Event::InventoryChanged(0),
                Event::Result(DrawOutcome::Exhausted),
            ]
        );
        assert_eq!(log.results().len(), 2);
    }

    #[test]
    fn test_same_seed_same_winners() {
        let pairs: [(&str, u32); 3] = [("A", 4), ("B", 3), ("C", 2)];
        let run = |seed| {
            let mut engine = DrawEngine::with_config(
                Inventory::from_entries(pairs),
                &DrawConfig::new().with_seed(seed),
            );
            let mut winners = Vec::new();
            while engine.request_start().is_ok() {
                engine.tick().unwrap();
                winners.push(engine.request_stop().unwrap().winner().unwrap().to_string());
            }
            winners
        };

        assert_eq!(run(99), run(99));
        assert_eq!(run(99).len(), 9);
    }

    #[test]
    fn test_commit_error_maps_to_core_error() {
        let err: EngineError = PrizeError::depleted("A").into();
        assert_eq!(err.to_string(), "Prize already depleted: A");
        assert!(matches!(err, EngineError::Core(PrizeError::Depleted { .. })));
    }
}
