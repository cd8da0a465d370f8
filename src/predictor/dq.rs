//! Delay queue: a bounded FIFO which holds new block addresses for a while
//! before they are admitted to the [RecentRequestTable].
//!
//! [RecentRequestTable]: crate::predictor::RecentRequestTable

use std::collections::VecDeque;
use crate::record::BlockAddr;

#[derive(Debug)]
pub struct DelayQueue {
    data: VecDeque<BlockAddr>,
    size: usize,
}
impl DelayQueue {
    pub fn new(size: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(size + 1),
            size,
        }
    }

    /// Push a block onto the queue. When the queue overflows, the oldest
    /// entry is removed and returned.
    pub fn push(&mut self, block: BlockAddr) -> Option<BlockAddr> {
        self.data.push_back(block);
        if self.data.len() > self.size {
            self.data.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize { self.data.len() }

    /// Iterate from oldest to youngest entry.
    pub fn iter(&self) -> impl Iterator<Item = &BlockAddr> {
        self.data.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn releases_oldest_on_overflow() {
        let mut dq = DelayQueue::new(2);
        assert_eq!(dq.push(1), None);
        assert_eq!(dq.push(2), None);
        assert_eq!(dq.push(3), Some(1));
        assert_eq!(dq.push(4), Some(2));
        assert_eq!(dq.len(), 2);
        assert_eq!(dq.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn duplicates_are_queued() {
        let mut dq = DelayQueue::new(3);
        dq.push(7);
        dq.push(7);
        assert_eq!(dq.len(), 2);
    }
}
