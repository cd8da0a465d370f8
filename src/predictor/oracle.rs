//! An ideal per-PC predictor which labels each load with the block touched
//! by the *next* load from the same PC.

use std::collections::*;
use crate::predictor::*;
use crate::record::*;

/// State captured by [OraclePredictor::train] for the record being replayed.
#[derive(Clone, Copy, Debug)]
struct Staged {
    instr_id: u64,
    pc: u64,

    /// The most recent observation for `pc` before this record
    prior: Option<(u64, BlockAddr)>,
}

/// Oracle predictor.
///
/// This isn't a causal model of hardware: the prediction for some load is
/// only known once the following load from the same PC is observed, so
/// the emitted [Prefetch] is attributed to the *earlier* instruction.
///
/// Every replayed record is observed regardless of the training window,
/// since labeling requires seeing the whole trace.
pub struct OraclePredictor {
    /// Earliest instruction id that may be labeled
    start_id: u64,

    /// Per-PC list of (instr_id, block) observations in arrival order
    history: HashMap<u64, Vec<(u64, BlockAddr)>>,

    staged: Option<Staged>,
}
impl OraclePredictor {
    pub fn new(start_id: u64) -> Self {
        Self {
            start_id,
            history: HashMap::new(),
            staged: None,
        }
    }

    /// Return all observations for a particular PC.
    pub fn history(&self, pc: u64) -> Option<&[(u64, BlockAddr)]> {
        self.history.get(&pc).map(|v| v.as_slice())
    }

    /// Returns the number of unique PCs observed.
    pub fn num_pcs(&self) -> usize { self.history.len() }
}

impl Prefetcher for OraclePredictor {
    fn name(&self) -> &'static str { "Oracle" }
    fn training_policy(&self) -> TrainingPolicy { TrainingPolicy::Always }

    fn train(&mut self, record: &TraceRecord) {
        let obs = self.history.entry(record.pc).or_default();
        self.staged = Some(Staged {
            instr_id: record.instr_id,
            pc: record.pc,
            prior: obs.last().copied(),
        });
        obs.push((record.instr_id, record.block()));
    }

    fn predict(&self, record: &TraceRecord) -> Option<Prefetch> {
        // Nothing to label unless this record was just observed
        let staged = self.staged
            .filter(|s| s.instr_id == record.instr_id && s.pc == record.pc)?;
        let (prior_id, _) = staged.prior?;
        if prior_id < self.start_id {
            return None;
        }
        Some(Prefetch::new(prior_id, record.block()))
    }
}
