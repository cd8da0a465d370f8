//! Recent request (RR) table: a bounded set of block addresses with
//! least-recently-used replacement.
//!
//! Entries live in a slab-backed doubly-linked list ordered from LRU (head)
//! to MRU (tail), with a hash index from block address to slab slot. This
//! makes lookup, touch, insertion and eviction O(1).

use std::collections::*;
use crate::record::BlockAddr;

#[derive(Clone, Copy, Debug)]
struct Node {
    block: BlockAddr,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A bounded LRU set of block addresses.
#[derive(Debug)]
pub struct RecentRequestTable {
    /// Maximum number of entries
    capacity: usize,

    /// Slab of list nodes (vacant slots are `None`)
    slots: Vec<Option<Node>>,

    /// Vacant slots available for reuse
    free: Vec<usize>,

    /// Block address -> slot
    index: HashMap<BlockAddr, usize>,

    /// Least-recently used entry
    head: Option<usize>,

    /// Most-recently used entry
    tail: Option<usize>,
}
impl RecentRequestTable {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);
        Self {
            capacity,
            slots: Vec::with_capacity(capacity + 1),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity + 1),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize { self.index.len() }
    pub fn is_empty(&self) -> bool { self.index.is_empty() }

    pub fn contains(&self, block: BlockAddr) -> bool {
        self.index.contains_key(&block)
    }

    /// Move an entry to the MRU position. Returns false if the block isn't
    /// present in the table.
    pub fn touch(&mut self, block: BlockAddr) -> bool {
        let Some(&slot) = self.index.get(&block) else {
            return false;
        };
        if self.tail != Some(slot) {
            self.unlink(slot);
            self.link_back(slot);
        }
        true
    }

    /// Insert a block at the MRU position, returning the LRU entry if it
    /// was evicted to make room.
    ///
    /// Inserting a block that is already present only refreshes it.
    pub fn insert(&mut self, block: BlockAddr) -> Option<BlockAddr> {
        if self.touch(block) {
            return None;
        }
        let node = Node { block, prev: None, next: None };
        let slot = match self.free.pop() {
            Some(slot) => { self.slots[slot] = Some(node); slot },
            None => { self.slots.push(Some(node)); self.slots.len() - 1 },
        };
        self.index.insert(block, slot);
        self.link_back(slot);

        if self.len() > self.capacity {
            self.evict()
        } else {
            None
        }
    }

    /// Remove and return the least-recently used entry.
    pub fn evict(&mut self) -> Option<BlockAddr> {
        let slot = self.head?;
        self.unlink(slot);
        let node = self.slots[slot].take()?;
        self.free.push(slot);
        self.index.remove(&node.block);
        Some(node.block)
    }

    /// Iterate over entries from least- to most-recently used.
    pub fn iter(&self) -> impl Iterator<Item = BlockAddr> + '_ {
        let mut cur = self.head;
        std::iter::from_fn(move || {
            let node = self.slots[cur?]?;
            cur = node.next;
            Some(node.block)
        })
    }

    /// Detach a slot from the list without freeing it.
    fn unlink(&mut self, slot: usize) {
        let Some(node) = self.slots[slot] else { return; };
        match node.prev {
            Some(p) => if let Some(n) = self.slots[p].as_mut() { n.next = node.next },
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => if let Some(x) = self.slots[n].as_mut() { x.prev = node.prev },
            None => self.tail = node.prev,
        }
        if let Some(n) = self.slots[slot].as_mut() {
            n.prev = None;
            n.next = None;
        }
    }

    /// Attach a detached slot at the MRU end.
    fn link_back(&mut self, slot: usize) {
        let old_tail = self.tail;
        if let Some(n) = self.slots[slot].as_mut() {
            n.prev = old_tail;
            n.next = None;
        }
        match old_tail {
            Some(t) => if let Some(n) = self.slots[t].as_mut() { n.next = Some(slot) },
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let mut rr = RecentRequestTable::new(3);
        assert_eq!(rr.insert(1), None);
        assert_eq!(rr.insert(2), None);
        assert_eq!(rr.insert(3), None);
        assert_eq!(rr.insert(4), Some(1));
        assert_eq!(rr.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(rr.len(), 3);
    }

    #[test]
    fn touch_protects_from_eviction() {
        let mut rr = RecentRequestTable::new(3);
        rr.insert(1);
        rr.insert(2);
        rr.insert(3);
        assert!(rr.touch(1));
        assert!(!rr.touch(9));
        assert_eq!(rr.iter().collect::<Vec<_>>(), vec![2, 3, 1]);
        assert_eq!(rr.insert(4), Some(2));
        assert!(rr.contains(1));
        assert!(!rr.contains(2));
    }

    #[test]
    fn reinsert_is_touch() {
        let mut rr = RecentRequestTable::new(2);
        rr.insert(1);
        rr.insert(2);
        assert_eq!(rr.insert(1), None);
        assert_eq!(rr.len(), 2);
        assert_eq!(rr.iter().collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn slots_are_recycled() {
        let mut rr = RecentRequestTable::new(4);
        for b in 0..1000 {
            rr.insert(b);
            assert!(rr.len() <= 4);
        }
        assert!(rr.slots.len() <= 5);
        assert_eq!(rr.iter().collect::<Vec<_>>(), vec![996, 997, 998, 999]);
    }

    #[test]
    fn touch_middle_and_head() {
        let mut rr = RecentRequestTable::new(4);
        for b in [10, 20, 30, 40] { rr.insert(b); }
        rr.touch(20);
        rr.touch(10);
        assert_eq!(rr.iter().collect::<Vec<_>>(), vec![30, 40, 20, 10]);
        assert_eq!(rr.evict(), Some(30));
        assert_eq!(rr.evict(), Some(40));
        assert_eq!(rr.evict(), Some(20));
        assert_eq!(rr.evict(), Some(10));
        assert_eq!(rr.evict(), None);
        assert!(rr.is_empty());
    }
}
