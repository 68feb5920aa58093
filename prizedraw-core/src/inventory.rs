use crate::error::{PrizeError, Result};
use crate::types::PrizeEntry;
use serde::{Deserialize, Serialize};

/// Ordered prize stock for one draw session.
///
/// Membership is fixed once built: entries keep listing order and only their
/// quantities change afterwards, through [`Inventory::decrement`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    entries: Vec<PrizeEntry>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, quantity)` pairs. A repeated name keeps its first
    /// position and takes the last quantity seen.
    pub fn from_entries<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<PrizeEntry>,
    {
        let mut inventory = Self::new();
        for entry in entries {
            inventory.upsert(entry.into());
        }
        inventory
    }

    /// Returns true when an existing entry was overwritten.
    pub(crate) fn upsert(&mut self, entry: PrizeEntry) -> bool {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => {
                existing.quantity = entry.quantity;
                true
            }
            None => {
                self.entries.push(entry);
                false
            }
        }
    }

    pub fn list(&self) -> &[PrizeEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&PrizeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_available(&self) -> bool {
        self.entries.iter().any(PrizeEntry::is_available)
    }

    /// Entries that can still be won, in listing order.
    pub fn eligible(&self) -> impl Iterator<Item = &PrizeEntry> + '_ {
        self.entries.iter().filter(|e| e.is_available())
    }

    pub fn total_remaining(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Take one unit of `name` out of stock and return what is left.
    pub fn decrement(&mut self, name: &str) -> Result<u32> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| PrizeError::not_found(name))?;

        if entry.quantity == 0 {
            return Err(PrizeError::depleted(name));
        }

        entry.quantity -= 1;
        tracing::debug!("Prize '{}' decremented, {} left", name, entry.quantity);
        Ok(entry.quantity)
    }
}
