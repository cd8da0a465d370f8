//! Drive a [Prefetcher] over a trace and collect the predictions.

use tracing::{info, trace};
use crate::predictor::*;
use crate::record::*;
use crate::stats::*;

/// Number of instructions in the units used by callers (millions).
pub const INSTRS_PER_UNIT: u64 = 1_000_000;

/// The half-open range of instruction ids `[start_id, stop_train_id)`
/// during which a predictor is trained.
///
/// Records before `start_id` are never presented to a predictor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainingWindow {
    pub start_id: u64,
    pub stop_train_id: u64,
}
impl TrainingWindow {
    pub fn new(start_id: u64, stop_train_id: u64) -> Self {
        Self { start_id, stop_train_id }
    }

    /// Create a window from bounds given in millions of instructions.
    pub fn from_millions(start: u64, stop_train: u64) -> Self {
        Self::new(
            start.saturating_mul(INSTRS_PER_UNIT),
            stop_train.saturating_mul(INSTRS_PER_UNIT),
        )
    }

    /// A window which trains on every record.
    pub fn unbounded() -> Self { Self::new(0, u64::MAX) }

    pub fn is_skipped(&self, instr_id: u64) -> bool {
        instr_id < self.start_id
    }

    pub fn is_training(&self, instr_id: u64) -> bool {
        instr_id >= self.start_id && instr_id < self.stop_train_id
    }
}

/// Replays a trace through a single predictor.
pub struct Replay<P: Prefetcher> {
    predictor: P,
    window: TrainingWindow,
    stats: ReplayStats,

    /// Emit a progress event every this many records (zero disables)
    progress_interval: u64,
}
impl<P: Prefetcher> Replay<P> {
    pub fn new(predictor: P, window: TrainingWindow) -> Self {
        Self {
            predictor,
            window,
            stats: ReplayStats::new(),
            progress_interval: 0,
        }
    }

    /// Collect per-PC statistics while replaying.
    pub fn with_pc_stats(mut self) -> Self {
        self.stats = ReplayStats::with_pcs();
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn predictor(&self) -> &P { &self.predictor }
    pub fn stats(&self) -> &ReplayStats { &self.stats }

    /// Consume the replay and return the predictor.
    pub fn into_inner(self) -> P { self.predictor }

    /// Lazily replay a sequence of records, yielding predictions.
    ///
    /// # Panics
    ///
    /// Panics if instruction ids decrease. Every predictor depends on
    /// records arriving in order.
    pub fn run<I>(&mut self, records: I) -> ReplayIter<'_, P, I::IntoIter>
        where I: IntoIterator<Item = TraceRecord>
    {
        ReplayIter {
            replay: self,
            records: records.into_iter(),
            last_id: None,
            done: false,
        }
    }

    /// Replay a sequence of records and collect all predictions.
    pub fn run_to_vec<I>(&mut self, records: I) -> Vec<PredictionRecord>
        where I: IntoIterator<Item = TraceRecord>
    {
        self.run(records).collect()
    }

    /// Present a single record to the predictor.
    fn step(&mut self, record: &TraceRecord) -> Option<PredictionRecord> {
        let train = match self.predictor.training_policy() {
            TrainingPolicy::Windowed => self.window.is_training(record.instr_id),
            TrainingPolicy::Always => true,
        };
        if train {
            self.predictor.train(record);
        }
        let res = self.predictor.predict(record).map(PredictionRecord::from);
        self.stats.update(record, train, res.is_some());

        if self.progress_interval != 0
            && self.stats.seen as u64 % self.progress_interval == 0
        {
            trace!(
                predictor = self.predictor.name(),
                instr_id = record.instr_id,
                seen = self.stats.seen,
                emitted = self.stats.emitted,
                "replay progress"
            );
        }
        res
    }
}

/// Iterator returned by [Replay::run].
pub struct ReplayIter<'a, P: Prefetcher, I> {
    replay: &'a mut Replay<P>,
    records: I,
    last_id: Option<u64>,
    done: bool,
}
impl<'a, P, I> Iterator for ReplayIter<'a, P, I>
    where P: Prefetcher, I: Iterator<Item = TraceRecord>
{
    type Item = PredictionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            if let Some(last) = self.last_id {
                assert!(record.instr_id >= last,
                    "trace out of order: instr_id {} follows {}",
                    record.instr_id, last);
            }
            self.last_id = Some(record.instr_id);

            if self.replay.window.is_skipped(record.instr_id) {
                self.replay.stats.skipped += 1;
                continue;
            }
            if let Some(res) = self.replay.step(&record) {
                return Some(res);
            }
        }

        if !self.done {
            self.done = true;
            let stats = &self.replay.stats;
            info!(
                predictor = self.replay.predictor.name(),
                seen = stats.seen,
                skipped = stats.skipped,
                trained = stats.trained,
                emitted = stats.emitted,
                "replay complete"
            );
        }
        None
    }
}
