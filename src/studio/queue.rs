use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop signal for a batch run. Checked between scenes, never
/// mid-request.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Pending scene indices for one batch, served strictly in ascending order
/// with a single item in flight.
#[derive(Debug, Clone)]
pub struct ImageQueue {
    pending: VecDeque<usize>,
    total: usize,
}

impl ImageQueue {
    pub fn new(mut pending: Vec<usize>, total: usize) -> Self {
        pending.sort_unstable();
        pending.dedup();
        Self {
            pending: pending.into(),
            total,
        }
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.pending.pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Scene count of the item the queue was built for.
    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_indices_in_ascending_order() {
        let mut queue = ImageQueue::new(vec![4, 0, 2, 2], 5);
        assert_eq!(queue.remaining(), 3);
        assert_eq!(queue.pop(), Some(0));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(4));
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.total(), 5);
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_cancelled());
        handle.cancel();
        assert!(flag.is_cancelled());
    }
}
