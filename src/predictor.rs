//! Implementations of different prefetch predictors.

pub mod oracle;
pub mod sisb;
pub mod best_offset;
pub mod rr;
pub mod dq;
pub mod score;

pub use oracle::*;
pub use sisb::*;
pub use best_offset::*;
pub use rr::*;
pub use dq::*;
pub use score::*;

use serde::{Deserialize, Serialize};
use crate::record::*;

/// Whether a predictor's state should only change inside the training window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrainingPolicy {
    /// Only train on records inside `[start_id, stop_train_id)`.
    Windowed,

    /// Train on every record presented to the predictor.
    Always,
}

/// Interface to a predictor which observes a stream of loads and guesses
/// which block should be prefetched next.
///
/// For every record, the harness calls [Prefetcher::train] (when the
/// record is in the training window) and then [Prefetcher::predict].
/// Implementations may only rely on records that have already been
/// presented to them.
pub trait Prefetcher {
    fn name(&self) -> &'static str;

    /// When the harness should call [Prefetcher::train].
    fn training_policy(&self) -> TrainingPolicy { TrainingPolicy::Windowed }

    /// Update the internal state of the predictor with a load.
    fn train(&mut self, record: &TraceRecord);

    /// Return the block that should be prefetched in response to a load.
    fn predict(&self, record: &TraceRecord) -> Option<Prefetch>;
}

impl<P: Prefetcher + ?Sized> Prefetcher for Box<P> {
    fn name(&self) -> &'static str { (**self).name() }
    fn training_policy(&self) -> TrainingPolicy {
        (**self).training_policy()
    }
    fn train(&mut self, record: &TraceRecord) { (**self).train(record) }
    fn predict(&self, record: &TraceRecord) -> Option<Prefetch> {
        (**self).predict(record)
    }
}

/// The available predictors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum PredictorKind {
    Oracle,
    Sisb,
    PcSisb,
    BestOffset,
}
impl PredictorKind {
    /// Create a new predictor of this kind.
    ///
    /// `start_id` is the first instruction id presented by the harness;
    /// only the oracle uses it.
    pub fn build(self, start_id: u64) -> Box<dyn Prefetcher> {
        match self {
            Self::Oracle => Box::new(OraclePredictor::new(start_id)),
            Self::Sisb => Box::new(SisbPredictor::new()),
            Self::PcSisb => Box::new(PcSisbPredictor::new()),
            Self::BestOffset => Box::new(BestOffsetPredictor::new()),
        }
    }
}
