//! Configuration for a single replay.
//!
//! Configuration may be supplied as JSON, for example:
//!
//! ```json
//! { "predictor": "best_offset", "start": 0, "stop_train": 500 }
//! ```
//!
//! Missing fields take the values in [defaults].

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::*;
use crate::harness::TrainingWindow;
use crate::predictor::PredictorKind;

/// Default configuration values.
pub mod defaults {
    use crate::predictor::PredictorKind;

    pub const PREDICTOR: PredictorKind = PredictorKind::BestOffset;

    /// First instruction presented to the predictor (millions).
    pub const START: u64 = 0;

    /// End of the training window (millions).
    pub const STOP_TRAIN: u64 = 500;

    /// Records between progress events.
    pub const PROGRESS_INTERVAL: u64 = 1_000_000;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    pub predictor: PredictorKind,

    /// Start of the training window, in millions of instructions
    pub start: u64,

    /// End of the training window, in millions of instructions
    pub stop_train: u64,

    /// Number of records between progress events (zero disables)
    pub progress_interval: u64,
}
impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            predictor: defaults::PREDICTOR,
            start: defaults::START,
            stop_train: defaults::STOP_TRAIN,
            progress_interval: defaults::PROGRESS_INTERVAL,
        }
    }
}
impl ReplayConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stop_train < self.start {
            return Err(Error::Config(format!(
                "stop_train ({}) is before start ({})",
                self.stop_train, self.start
            )));
        }
        Ok(())
    }

    /// Return the training window in instruction ids.
    pub fn window(&self) -> TrainingWindow {
        TrainingWindow::from_millions(self.start, self.stop_train)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg = ReplayConfig::from_json("{ \"predictor\": \"sisb\" }").unwrap();
        assert_eq!(cfg.predictor, PredictorKind::Sisb);
        assert_eq!(cfg.start, 0);
        assert_eq!(cfg.stop_train, 500);
        assert_eq!(cfg.window(), TrainingWindow::new(0, 500_000_000));
    }

    #[test]
    fn rejects_inverted_window() {
        let res = ReplayConfig::from_json("{ \"start\": 10, \"stop_train\": 5 }");
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    fn rejects_unknown_fields() {
        let res = ReplayConfig::from_json("{ \"stop\": 5 }");
        assert!(matches!(res, Err(Error::Json(_))));
    }

    #[test]
    fn json_round_trip() {
        let cfg = ReplayConfig {
            predictor: PredictorKind::Oracle,
            start: 1,
            stop_train: 2,
            progress_interval: 0,
        };
        let text = serde_json::to_string(&cfg).unwrap();
        assert_eq!(ReplayConfig::from_json(&text).unwrap(), cfg);
    }
}
