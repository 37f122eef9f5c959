use std::collections::BinaryHeap;

// ---------------------------------------------------------------------------
// Heap entry
// ---------------------------------------------------------------------------

/// Reference into a node table, ordered by `key` then insertion sequence.
#[derive(Clone, Copy, Eq, PartialEq)]
struct Entry<K> {
    key: K,
    seq: u64,
    idx: usize,
}

impl<K: Ord> Ord for Entry<K> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed so BinaryHeap (max-heap) pops the smallest key first, and
        // among equal keys the earliest insertion.
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<K: Ord> PartialOrd for Entry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Frontier
// ---------------------------------------------------------------------------

/// Min-priority frontier with FIFO tie-breaking.
///
/// Priorities are never updated in place: an improved cell is pushed again
/// and the outdated entry is discarded lazily by [`peek_live`](Self::peek_live).
pub(crate) struct Frontier<K> {
    heap: BinaryHeap<Entry<K>>,
    next_seq: u64,
}

impl<K: Ord + Copy> Frontier<K> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub(crate) fn push(&mut self, idx: usize, key: K) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { key, seq, idx });
    }

    /// Drop outdated entries from the top and return the best live one.
    pub(crate) fn peek_live(&mut self, is_live: impl Fn(usize, K) -> bool) -> Option<usize> {
        while let Some(top) = self.heap.peek() {
            if is_live(top.idx, top.key) {
                return Some(top.idx);
            }
            self.heap.pop();
        }
        None
    }

    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|e| e.idx)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
