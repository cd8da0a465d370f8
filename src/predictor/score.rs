//! Scoreboard for candidate offsets.

/// A fixed set of candidate offsets, each with a score.
#[derive(Clone, Debug)]
pub struct OffsetScores {
    offsets: &'static [i64],
    scores: Vec<u32>,
}
impl OffsetScores {
    pub fn new(offsets: &'static [i64]) -> Self {
        assert!(!offsets.is_empty());
        Self {
            offsets,
            scores: vec![0; offsets.len()],
        }
    }

    /// Returns the number of candidate offsets.
    pub fn len(&self) -> usize { self.offsets.len() }

    /// Return the candidate offset at some index.
    pub fn offset(&self, idx: usize) -> i64 { self.offsets[idx] }

    /// Return the score of the candidate offset at some index.
    pub fn score(&self, idx: usize) -> u32 { self.scores[idx] }

    /// Return the score for a particular offset value.
    pub fn score_of(&self, offset: i64) -> Option<u32> {
        self.offsets.iter().position(|o| *o == offset)
            .map(|idx| self.scores[idx])
    }

    pub fn increment(&mut self, idx: usize) {
        self.scores[idx] += 1;
    }

    /// Sum of all scores.
    pub fn total(&self) -> u32 { self.scores.iter().sum() }

    pub fn reset(&mut self) {
        self.scores.iter_mut().for_each(|s| *s = 0);
    }

    /// Return the `(score, offset)` pair with the highest score.
    ///
    /// Ties are broken in favor of the numerically larger offset.
    pub fn best(&self) -> (u32, i64) {
        self.scores.iter().copied()
            .zip(self.offsets.iter().copied())
            .max()
            .unwrap_or((0, 0))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static OFFSETS: [i64; 6] = [1, -1, 2, -2, 3, -3];

    #[test]
    fn best_prefers_highest_score() {
        let mut s = OffsetScores::new(&OFFSETS);
        s.increment(3);
        s.increment(3);
        s.increment(4);
        assert_eq!(s.best(), (2, -2));
        assert_eq!(s.total(), 3);
    }

    #[test]
    fn ties_pick_larger_offset() {
        let mut s = OffsetScores::new(&OFFSETS);
        s.increment(4); // 3
        s.increment(1); // -1
        assert_eq!(s.best(), (1, 3));

        let mut s = OffsetScores::new(&OFFSETS);
        s.increment(1); // -1
        s.increment(5); // -3
        assert_eq!(s.best(), (1, -1));
    }

    #[test]
    fn all_zero_picks_largest_offset() {
        let s = OffsetScores::new(&OFFSETS);
        assert_eq!(s.best(), (0, 3));
    }

    #[test]
    fn reset_clears_scores() {
        let mut s = OffsetScores::new(&OFFSETS);
        s.increment(0);
        s.increment(2);
        s.reset();
        assert_eq!(s.total(), 0);
        assert_eq!(s.score_of(1), Some(0));
        assert_eq!(s.score_of(9), None);
    }
}
