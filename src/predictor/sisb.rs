//! Address correlation predictors.
//!
//! Both predictors remember, for each PC, the last block it touched. When a
//! PC touches a new block, the previous block is correlated with the new
//! one. A later access to a correlated block predicts its successor.
//!
//! - [SisbPredictor] keeps a single global correlation table keyed by block.
//! - [PcSisbPredictor] keys the correlation table by (pc, block), so that
//!   different PCs touching the same block don't alias.

use std::collections::*;
use crate::predictor::*;
use crate::record::*;

/// Global address correlation predictor.
pub struct SisbPredictor {
    /// Last block observed for each PC
    last: HashMap<u64, BlockAddr>,

    /// Block -> next block
    correlation: HashMap<BlockAddr, BlockAddr>,
}
impl SisbPredictor {
    pub fn new() -> Self {
        Self {
            last: HashMap::new(),
            correlation: HashMap::new(),
        }
    }

    /// Return the successor correlated with some block.
    pub fn successor(&self, block: BlockAddr) -> Option<BlockAddr> {
        self.correlation.get(&block).copied()
    }

    /// Returns the number of entries in the correlation table.
    pub fn len(&self) -> usize { self.correlation.len() }

    pub fn is_empty(&self) -> bool { self.correlation.is_empty() }
}
impl Default for SisbPredictor {
    fn default() -> Self { Self::new() }
}

impl Prefetcher for SisbPredictor {
    fn name(&self) -> &'static str { "SISB" }

    fn train(&mut self, record: &TraceRecord) {
        let block = record.block();
        if let Some(prev) = self.last.insert(record.pc, block) {
            self.correlation.insert(prev, block);
        }
    }

    fn predict(&self, record: &TraceRecord) -> Option<Prefetch> {
        self.successor(record.block())
            .map(|next| Prefetch::new(record.instr_id, next))
    }
}

/// PC-qualified address correlation predictor.
///
/// This predictor always learns: it reports [TrainingPolicy::Always].
pub struct PcSisbPredictor {
    /// Last block observed for each PC
    last: HashMap<u64, BlockAddr>,

    /// (pc, block) -> next block
    correlation: HashMap<(u64, BlockAddr), BlockAddr>,
}
impl PcSisbPredictor {
    pub fn new() -> Self {
        Self {
            last: HashMap::new(),
            correlation: HashMap::new(),
        }
    }

    /// Return the successor correlated with some block for a particular PC.
    pub fn successor(&self, pc: u64, block: BlockAddr) -> Option<BlockAddr> {
        self.correlation.get(&(pc, block)).copied()
    }

    /// Returns the number of entries in the correlation table.
    pub fn len(&self) -> usize { self.correlation.len() }

    pub fn is_empty(&self) -> bool { self.correlation.is_empty() }
}
impl Default for PcSisbPredictor {
    fn default() -> Self { Self::new() }
}

impl Prefetcher for PcSisbPredictor {
    fn name(&self) -> &'static str { "PC-SISB" }

    fn training_policy(&self) -> TrainingPolicy { TrainingPolicy::Always }

    fn train(&mut self, record: &TraceRecord) {
        let block = record.block();
        if let Some(prev) = self.last.insert(record.pc, block) {
            self.correlation.insert((record.pc, prev), block);
        }
    }

    fn predict(&self, record: &TraceRecord) -> Option<Prefetch> {
        self.successor(record.pc, record.block())
            .map(|next| Prefetch::new(record.instr_id, next))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn replay(p: &mut impl Prefetcher, records: &[TraceRecord])
        -> Vec<Option<Prefetch>>
    {
        records.iter().map(|r| { p.train(r); p.predict(r) }).collect()
    }

    #[test]
    fn sisb_correlates_successor() {
        let records = [
            TraceRecord::new(1, 0xa, 0x1000, false),
            TraceRecord::new(2, 0xa, 0x2000, false),
            TraceRecord::new(3, 0xa, 0x1000, false),
        ];
        let mut p = SisbPredictor::new();
        let out = replay(&mut p, &records);
        assert_eq!(out[0], None);
        // 0x2000 has no successor yet when record 2 is predicted
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(Prefetch::new(3, block_of(0x2000))));
        assert_eq!(p.successor(block_of(0x1000)), Some(block_of(0x2000)));
        assert_eq!(p.successor(block_of(0x2000)), Some(block_of(0x1000)));
    }

    #[test]
    fn sisb_table_is_global() {
        let mut p = SisbPredictor::new();
        replay(&mut p, &[
            TraceRecord::new(1, 0xa, 0x1000, false),
            TraceRecord::new(2, 0xa, 0x5000, false),
        ]);
        // A different PC touching 0x1000 still gets a prediction
        let r = TraceRecord::new(3, 0xb, 0x1000, false);
        assert_eq!(p.predict(&r), Some(Prefetch::new(3, block_of(0x5000))));
    }

    #[test]
    fn pc_sisb_does_not_alias() {
        let mut p = PcSisbPredictor::new();
        replay(&mut p, &[
            TraceRecord::new(1, 0xa, 0x1000, false),
            TraceRecord::new(2, 0xa, 0x5000, false),
        ]);
        assert_eq!(p.len(), 1);
        let other = TraceRecord::new(3, 0xb, 0x1000, false);
        assert_eq!(p.predict(&other), None);
        let same = TraceRecord::new(4, 0xa, 0x1000, false);
        assert_eq!(p.predict(&same), Some(Prefetch::new(4, block_of(0x5000))));
    }

    #[test]
    fn same_block_offsets_share_entry() {
        let mut p = SisbPredictor::new();
        replay(&mut p, &[
            TraceRecord::new(1, 0xa, 0x1008, false),
            TraceRecord::new(2, 0xa, 0x2030, false),
        ]);
        assert_eq!(p.successor(block_of(0x1000)), Some(block_of(0x2000)));
        assert!(!p.is_empty());
    }
}
