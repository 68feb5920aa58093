use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One committed win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawRecord {
    pub id: Uuid,
    pub sequence: u64,
    pub prize: String,
    pub remaining: u32,
    pub drawn_at: DateTime<Utc>,
}

/// Wins of a single session, oldest first. Lives only as long as the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawHistory {
    records: Vec<DrawRecord>,
}

impl DrawHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, prize: &str, remaining: u32) -> &DrawRecord {
        let record = DrawRecord {
            id: Uuid::new_v4(),
            sequence: self.records.len() as u64 + 1,
            prize: prize.to_string(),
            remaining,
            drawn_at: Utc::now(),
        };
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&DrawRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Wins per prize, in order of each prize's first win.
    pub fn tally(&self) -> Vec<(String, usize)> {
        let mut tally: Vec<(String, usize)> = Vec::new();
        for record in &self.records {
            match tally.iter_mut().find(|(name, _)| *name == record.prize) {
                Some((_, count)) => *count += 1,
                None => tally.push((record.prize.clone(), 1)),
            }
        }
        tally
    }
}
