//! Max-priority queue of triangle errors with lazy invalidation.
//!
//! Entries refer to triangles by arena slot plus the slot's generation at the
//! time the entry was pushed. Overwriting a slot bumps its generation, so
//! entries for replaced triangles are recognized and dropped when popped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Clone, Copy, Debug)]
pub struct QueueEntry {
    pub error: f32,
    /// Row-major grid index of the candidate sample.
    pub pixel: usize,
    pub slot: usize,
    pub generation: u32,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Largest error first; equal errors prefer the lowest candidate index, then
// the lowest slot.
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.error
            .total_cmp(&other.error)
            .then_with(|| other.pixel.cmp(&self.pixel))
            .then_with(|| other.slot.cmp(&self.slot))
            .then_with(|| other.generation.cmp(&self.generation))
    }
}

#[derive(Debug, Default)]
pub struct ErrorQueue {
    heap: BinaryHeap<QueueEntry>,
}

impl ErrorQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: QueueEntry) {
        self.heap.push(entry);
    }

    /// Discards stale entries from the top and returns the live maximum.
    pub fn peek_live<F>(&mut self, is_live: F) -> Option<QueueEntry>
    where
        F: Fn(&QueueEntry) -> bool,
    {
        while let Some(top) = self.heap.peek() {
            if is_live(top) {
                return Some(*top);
            }
            self.heap.pop();
        }
        None
    }

    pub fn pop(&mut self) -> Option<QueueEntry> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(error: f32, pixel: usize, slot: usize, generation: u32) -> QueueEntry {
        QueueEntry { error, pixel, slot, generation }
    }

    #[test]
    fn test_pops_largest_error_first() {
        let mut q = ErrorQueue::new();
        q.push(entry(0.1, 5, 0, 0));
        q.push(entry(0.9, 7, 1, 0));
        q.push(entry(0.5, 2, 2, 0));
        assert_eq!(q.pop().map(|e| e.slot), Some(1));
        assert_eq!(q.pop().map(|e| e.slot), Some(2));
        assert_eq!(q.pop().map(|e| e.slot), Some(0));
        assert!(q.is_empty());
    }

    #[test]
    fn test_equal_errors_prefer_lowest_pixel() {
        let mut q = ErrorQueue::new();
        q.push(entry(0.5, 40, 0, 0));
        q.push(entry(0.5, 12, 3, 0));
        q.push(entry(0.5, 12, 1, 0));
        let first = q.pop().unwrap();
        assert_eq!((first.pixel, first.slot), (12, 1));
        assert_eq!(q.pop().unwrap().slot, 3);
    }

    #[test]
    fn test_peek_live_drops_stale_entries() {
        let mut q = ErrorQueue::new();
        q.push(entry(0.9, 1, 0, 0));
        q.push(entry(0.3, 2, 1, 0));
        let generations = [1u32, 0];
        let live = q.peek_live(|e| generations[e.slot] == e.generation).unwrap();
        assert_eq!(live.slot, 1);
        assert_eq!(q.len(), 1);
    }
}
