use crate::error::{PrizeError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MIN_TICK: Duration = Duration::from_millis(1);
const MAX_TICK: Duration = Duration::from_secs(10);

/// Draw session settings. The engine itself never sleeps; these values are
/// read by whatever scheduler drives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub tick_interval: Duration,
    pub auto_stop: Option<Duration>,
    pub seed: Option<u64>,
    pub warning_preview: usize,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            auto_stop: None,
            seed: None,
            warning_preview: 3,
        }
    }
}

impl DrawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slow ticks and a fixed three second spin, stopped without operator input.
    pub fn classic() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            auto_stop: Some(Duration::from_secs(3)),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval < MIN_TICK || self.tick_interval > MAX_TICK {
            return Err(PrizeError::config(format!(
                "Tick interval must be between {:?} and {:?}, got {:?}",
                MIN_TICK, MAX_TICK, self.tick_interval
            )));
        }

        if let Some(auto_stop) = self.auto_stop {
            if auto_stop <= self.tick_interval {
                return Err(PrizeError::config(
                    "Auto-stop delay must be longer than the tick interval",
                ));
            }
        }

        if self.warning_preview == 0 {
            return Err(PrizeError::config("Warning preview must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(DrawConfig::default().validate().is_ok());
        assert!(DrawConfig::classic().validate().is_ok());
        assert_eq!(DrawConfig::classic().auto_stop, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DrawConfig::new();
        config.tick_interval = Duration::ZERO;
        assert!(matches!(config.validate(), Err(PrizeError::Config(_))));

        let mut config = DrawConfig::new();
        config.auto_stop = Some(Duration::from_millis(10));
        assert!(config.validate().is_err());

        let mut config = DrawConfig::new();
        config.warning_preview = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DrawConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(config, DrawConfig::new().with_seed(7));
    }
}
