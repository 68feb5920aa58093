use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeEntry {
    pub name: String,
    pub quantity: u32,
}

impl PrizeEntry {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }

    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

impl<S: Into<String>> From<(S, u32)> for PrizeEntry {
    fn from((name, quantity): (S, u32)) -> Self {
        Self::new(name, quantity)
    }
}
