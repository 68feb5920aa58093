use crate::{DrawEngine, EngineError, Result};
use parking_lot::{Mutex, RwLock};
use prizedraw_core::{DrawConfig, Inventory};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub type SharedEngine = Arc<Mutex<DrawEngine>>;

struct Session {
    label: String,
    engine: SharedEngine,
}

/// Independent draw sessions, e.g. one per booth or window. Each session owns
/// its own inventory; nothing is shared between them.
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn open(&self, label: &str, inventory: Inventory, config: &DrawConfig) -> Uuid {
        let engine = DrawEngine::with_config(inventory, config);
        let id = engine.id();

        {
            let mut sessions = self.sessions.write();
            sessions.insert(
                id,
                Session {
                    label: label.to_string(),
                    engine: Arc::new(Mutex::new(engine)),
                },
            );
        }

        tracing::info!("Opened session '{}' with ID: {}", label, id);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<SharedEngine> {
        self.sessions.read().get(&id).map(|s| s.engine.clone())
    }

    pub fn close(&self, id: Uuid) -> Result<()> {
        let session = self
            .sessions
            .write()
            .remove(&id)
            .ok_or(EngineError::SessionNotFound(id))?;

        tracing::info!("Closed session '{}' ({})", session.label, id);
        Ok(())
    }

    /// `(id, label)` pairs sorted by label.
    pub fn list(&self) -> Vec<(Uuid, String)> {
        let mut sessions: Vec<(Uuid, String)> = self
            .sessions
            .read()
            .iter()
            .map(|(id, s)| (*id, s.label.clone()))
            .collect();
        sessions.sort_by(|a, b| a.1.cmp(&b.1));
        sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
