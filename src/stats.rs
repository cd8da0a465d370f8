//! Helpers for collecting statistics.

use std::collections::*;
use bitvec::prelude::*;
use itertools::*;
use crate::record::*;

/// Container for recording simple statistics while replaying a trace.
///
/// Per-PC statistics grow with the length of the trace, so they are only
/// collected when requested with [ReplayStats::with_pcs].
#[derive(Debug, Default)]
pub struct ReplayStats {
    /// Per-PC statistics (indexed by program counter value).
    pub data: BTreeMap<u64, PcStats>,

    /// Whether to collect per-PC statistics
    per_pc: bool,

    /// Number of records presented to the predictor
    pub seen: usize,

    /// Number of records dropped before the start of the window
    pub skipped: usize,

    /// Number of records used to train the predictor
    pub trained: usize,

    /// Number of emitted predictions
    pub emitted: usize,
}
impl ReplayStats {
    pub fn new() -> Self { Self::default() }

    /// Also collect per-PC statistics.
    pub fn with_pcs() -> Self {
        Self { per_pc: true, ..Self::default() }
    }

    /// Record a single access and whether it produced a prediction.
    pub fn update(&mut self, record: &TraceRecord, trained: bool, issued: bool) {
        self.seen += 1;
        if trained { self.trained += 1; }
        if issued { self.emitted += 1; }
        if !self.per_pc { return; }
        let data = self.get_mut(record.pc);
        data.occ += 1;
        data.pat.push(issued);
        if issued { data.issued += 1; }
    }

    /// Return the fraction of presented records which produced a prediction.
    pub fn coverage(&self) -> f64 {
        if self.seen == 0 { return 0.0; }
        self.emitted as f64 / self.seen as f64
    }

    /// Returns a reference to data collected for a particular PC.
    pub fn get(&self, pc: u64) -> Option<&PcStats> {
        self.data.get(&pc)
    }

    /// Returns a mutable reference to data collected for a particular PC.
    /// Creates a new entry if one doesn't already exist.
    pub fn get_mut(&mut self, pc: u64) -> &mut PcStats {
        self.data.entry(pc).or_default()
    }

    /// Returns the number of unique observed PCs.
    pub fn num_unique_pcs(&self) -> usize { self.data.len() }

    /// Returns the number of PCs that never produced a prediction.
    pub fn num_silent_pcs(&self) -> usize {
        self.data.values().filter(|s| s.issued == 0).count()
    }

    /// Return the `n` most frequently occurring PCs.
    pub fn top_pcs(&self, n: usize) -> Vec<(u64, &PcStats)> {
        self.data.iter()
            .sorted_by(|x, y| y.1.occ.cmp(&x.1.occ).then(x.0.cmp(y.0)))
            .take(n)
            .map(|(pc, s)| (*pc, s))
            .collect()
    }
}

/// Container for per-PC statistics.
#[derive(Debug, Default)]
pub struct PcStats {
    /// Number of times this PC was encountered.
    pub occ: usize,

    /// Number of predictions emitted for this PC.
    pub issued: usize,

    /// One bit per occurrence; set when a prediction was emitted.
    pub pat: BitVec,
}
impl PcStats {
    /// Return the fraction of occurrences which produced a prediction.
    pub fn coverage(&self) -> f64 {
        if self.occ == 0 { return 0.0; }
        self.issued as f64 / self.occ as f64
    }

    /// Length of the longest run of consecutive occurrences that
    /// produced a prediction.
    pub fn longest_streak(&self) -> usize {
        self.pat.iter().by_vals()
            .group_by(|b| *b)
            .into_iter()
            .filter(|(b, _)| *b)
            .map(|(_, run)| run.count())
            .max()
            .unwrap_or(0)
    }

    /// Render the most recent `n` occurrences, oldest first
    /// ('1' when a prediction was emitted).
    pub fn recent_pattern(&self, n: usize) -> String {
        let start = self.pat.len().saturating_sub(n);
        self.pat[start..].iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rec(id: u64, pc: u64) -> TraceRecord {
        TraceRecord::new(id, pc, 0x1000, false)
    }

    #[test]
    fn counts_and_coverage() {
        let mut s = ReplayStats::with_pcs();
        s.update(&rec(1, 0xa), true, false);
        s.update(&rec(2, 0xa), true, true);
        s.update(&rec(3, 0xb), false, true);
        s.update(&rec(4, 0xa), false, true);
        assert_eq!(s.seen, 4);
        assert_eq!(s.trained, 2);
        assert_eq!(s.emitted, 3);
        assert_eq!(s.coverage(), 0.75);
        assert_eq!(s.num_unique_pcs(), 2);
        assert_eq!(s.num_silent_pcs(), 0);

        let a = s.get(0xa).unwrap();
        assert_eq!(a.occ, 3);
        assert_eq!(a.issued, 2);
        assert_eq!(a.recent_pattern(8), "011");
        assert_eq!(a.recent_pattern(2), "11");
        assert_eq!(a.longest_streak(), 2);
    }

    #[test]
    fn top_pcs_by_occurrence() {
        let mut s = ReplayStats::with_pcs();
        for (id, pc) in [0xb, 0xa, 0xb, 0xc, 0xb, 0xa].iter().enumerate() {
            s.update(&rec(id as u64, *pc), true, false);
        }
        let top: Vec<u64> = s.top_pcs(2).iter().map(|(pc, _)| *pc).collect();
        assert_eq!(top, vec![0xb, 0xa]);
        assert_eq!(s.num_silent_pcs(), 3);
        assert_eq!(s.coverage(), 0.0);
    }

    #[test]
    fn global_only_by_default() {
        let mut s = ReplayStats::new();
        s.update(&rec(1, 0xa), true, true);
        s.update(&rec(2, 0xb), true, false);
        assert_eq!(s.seen, 2);
        assert_eq!(s.emitted, 1);
        assert_eq!(s.num_unique_pcs(), 0);
        assert!(s.get(0xa).is_none());
    }

    #[test]
    fn empty_stats() {
        let s = ReplayStats::new();
        assert_eq!(s.coverage(), 0.0);
        assert!(s.top_pcs(4).is_empty());
        assert_eq!(PcStats::default().longest_streak(), 0);
    }
}
