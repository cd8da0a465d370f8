//! An offset-learning ("Best-Offset") predictor.
//!
//! The predictor repeatedly tests a fixed list of candidate offsets against
//! a table of recently requested blocks. Each incoming block tests one
//! candidate `d`: if `block - d` was requested recently, `d` would have
//! produced a timely prefetch and its score is incremented. A learning
//! episode ends when some offset reaches [SCORE_MAX] or after [ROUND_MAX]
//! passes over the candidate list; the best offset then becomes the
//! prefetch offset for the next episode (or prefetching is disabled if
//! the best score is too low).
//!
//! New blocks pass through a [DelayQueue] before reaching the
//! [RecentRequestTable] so that the immediately preceding accesses can't
//! dominate scoring.

use tracing::debug;
use crate::predictor::*;
use crate::record::*;

/// Candidate offsets (in blocks), in the order they are tested.
pub static OFFSETS: [i64; 46] = [
      1,  -1,   2,  -2,   3,  -3,   4,  -4,   5,  -5,   6,  -6,
      7,  -7,   8,  -8,   9,  -9,  10, -10,  11, -11,  12, -12,
     13, -13,  14, -14,  15, -15,  16, -16,  18, -18,  20, -20,
     24, -24,  30, -30,  32, -32,  36, -36,  40, -40,
];

/// A score which immediately ends a learning episode.
pub const SCORE_MAX: u32 = 31;

/// Maximum number of rounds in a learning episode.
pub const ROUND_MAX: u32 = 100;

/// Best scores at or below this value disable prefetching.
pub const BAD_SCORE: u32 = 10;

/// Number of entries in the delay queue.
pub const DQSIZE: usize = 15;

/// Number of entries in the recent request table (2 banks of 64 entries).
pub const RRSIZE: usize = 128;

pub struct BestOffsetPredictor {
    rr: RecentRequestTable,
    dq: DelayQueue,
    scores: OffsetScores,

    /// Index of the next candidate offset to test
    cursor: usize,

    /// Number of completed rounds in the current learning episode
    rounds: u32,

    /// Current prefetch offset (zero disables prefetching)
    offset: i64,

    /// Number of completed learning episodes
    episodes: usize,
}
impl BestOffsetPredictor {
    pub fn new() -> Self {
        Self {
            rr: RecentRequestTable::new(RRSIZE),
            dq: DelayQueue::new(DQSIZE),
            scores: OffsetScores::new(&OFFSETS),
            cursor: 0,
            rounds: 0,
            offset: 0,
            episodes: 0,
        }
    }

    /// Return the current prefetch offset.
    pub fn offset(&self) -> i64 { self.offset }

    /// Return the index of the next candidate offset to be tested.
    pub fn cursor(&self) -> usize { self.cursor }

    /// Return the number of rounds completed in the current episode.
    pub fn rounds(&self) -> u32 { self.rounds }

    /// Return the number of completed learning episodes.
    pub fn episodes(&self) -> usize { self.episodes }

    pub fn scores(&self) -> &OffsetScores { &self.scores }
    pub fn recent_requests(&self) -> &RecentRequestTable { &self.rr }
    pub fn delay_queue(&self) -> &DelayQueue { &self.dq }

    /// Update the recent request table and delay queue with a block.
    ///
    /// Recently requested blocks are only refreshed in the RR table.
    /// Other blocks enter the delay queue, and the block displaced from
    /// the delay queue (if any) is admitted to the RR table.
    pub fn update_tables(&mut self, block: BlockAddr) {
        if self.rr.touch(block) {
            return;
        }
        if let Some(delayed) = self.dq.push(block) {
            self.rr.insert(delayed);
        }
    }

    /// Perform one step of the learning phase with a block.
    pub fn update_predictor(&mut self, block: BlockAddr) {
        let d = self.scores.offset(self.cursor);
        if self.rr.contains(block.wrapping_add_signed(d.wrapping_neg())) {
            self.scores.increment(self.cursor);
        }

        self.cursor += 1;
        if self.cursor < self.scores.len() {
            return;
        }

        // End of a round
        self.cursor = 0;
        self.rounds += 1;
        let (best_score, best_offset) = self.scores.best();
        if best_score >= SCORE_MAX || self.rounds >= ROUND_MAX {
            self.offset = if best_score > BAD_SCORE { best_offset } else { 0 };
            debug!(
                episode = self.episodes,
                rounds = self.rounds,
                best_score,
                best_offset,
                offset = self.offset,
                "learning episode complete"
            );
            self.episodes += 1;
            self.scores.reset();
            self.rounds = 0;
        }
    }
}
impl Default for BestOffsetPredictor {
    fn default() -> Self { Self::new() }
}

impl Prefetcher for BestOffsetPredictor {
    fn name(&self) -> &'static str { "BestOffset" }

    fn train(&mut self, record: &TraceRecord) {
        let block = record.block();
        self.update_tables(block);
        self.update_predictor(block);
    }

    fn predict(&self, record: &TraceRecord) -> Option<Prefetch> {
        if self.offset == 0 {
            return None;
        }
        let target = record.block().wrapping_add_signed(self.offset);
        Some(Prefetch::new(record.instr_id, target))
    }
}
