//! FIFO backlog of pending work
//!
//! A `VecDeque` with one extra operation, [`Backlog::splice`], which
//! removes a window of pending entries using array-splice index rules.
//! The pool keeps it behind its state mutex; it does no locking itself.

use std::collections::VecDeque;

/// Ordered queue of pending entries, head = next to admit
#[derive(Debug)]
pub(crate) struct Backlog<T> {
    queue: VecDeque<T>,
}

impl<T> Backlog<T> {
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }

    /// Append at the tail
    #[inline]
    pub fn push_back(&mut self, item: T) {
        self.queue.push_back(item);
    }

    /// Take the head (earliest submitted) entry
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Remove up to `count` entries starting at `index`
    ///
    /// Index rules:
    /// - negative `index` counts back from the tail, clamped to 0
    /// - `index` past the tail removes nothing
    /// - `count <= 0` removes nothing
    /// - `count` is clamped to the entries left after `index`
    ///
    /// Returns the removed entries in their original order.
    pub fn splice(&mut self, index: isize, count: isize) -> Vec<T> {
        let (start, n) = splice_window(self.queue.len(), index, count);
        if n == 0 {
            return Vec::new();
        }
        self.queue.drain(start..start + n).collect()
    }
}

impl<T> Default for Backlog<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve `(index, count)` against a queue of `len` into `(start, n)`
fn splice_window(len: usize, index: isize, count: isize) -> (usize, usize) {
    let start = if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        (index as usize).min(len)
    };
    let n = if count <= 0 {
        0
    } else {
        (count as usize).min(len - start)
    };
    (start, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backlog_of(n: u32) -> Backlog<u32> {
        let mut b = Backlog::new();
        for i in 0..n {
            b.push_back(i);
        }
        b
    }

    fn contents(b: &Backlog<u32>) -> Vec<u32> {
        b.queue.iter().copied().collect()
    }

    #[test]
    fn test_fifo_order() {
        let mut b = backlog_of(3);
        assert_eq!(b.len(), 3);
        assert_eq!(b.pop_front(), Some(0));
        assert_eq!(b.pop_front(), Some(1));
        assert_eq!(b.pop_front(), Some(2));
        assert_eq!(b.pop_front(), None);
        assert!(b.is_empty());
    }

    #[test]
    fn test_splice_middle() {
        let mut b = backlog_of(5);
        assert_eq!(b.splice(1, 2), vec![1, 2]);
        assert_eq!(contents(&b), vec![0, 3, 4]);
    }

    #[test]
    fn test_splice_negative_index() {
        let mut b = backlog_of(5);
        assert_eq!(b.splice(-2, 1), vec![3]);
        assert_eq!(contents(&b), vec![0, 1, 2, 4]);

        // Far negative clamps to the head
        let mut b = backlog_of(3);
        assert_eq!(b.splice(-10, 1), vec![0]);
    }

    #[test]
    fn test_splice_count_clamped() {
        let mut b = backlog_of(4);
        assert_eq!(b.splice(2, 100), vec![2, 3]);
        assert_eq!(contents(&b), vec![0, 1]);
    }

    #[test]
    fn test_splice_noops() {
        let mut b = backlog_of(3);
        assert!(b.splice(0, 0).is_empty());
        assert!(b.splice(1, -4).is_empty());
        assert!(b.splice(3, 1).is_empty());
        assert!(b.splice(isize::MAX, 1).is_empty());
        assert_eq!(contents(&b), vec![0, 1, 2]);

        let mut empty: Backlog<u32> = Backlog::new();
        assert!(empty.splice(0, 1).is_empty());
        assert!(empty.splice(-1, 1).is_empty());
    }

    #[test]
    fn test_splice_window_edges() {
        assert_eq!(splice_window(5, 0, 5), (0, 5));
        assert_eq!(splice_window(5, -5, 2), (0, 2));
        assert_eq!(splice_window(5, isize::MIN, 1), (0, 1));
        assert_eq!(splice_window(0, 0, 3), (0, 0));
    }
}
