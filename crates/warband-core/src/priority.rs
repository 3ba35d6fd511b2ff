//! Bucketed priority queue for ranking a tick's pending work.
//!
//! One bucket per [`Priority`] level. The queue is rebuilt every tick, so
//! there is no persistence and no preemption: once [`PriorityQueue::drain`]
//! has moved past a level, items enqueued there later in the same drain are
//! not revisited.

use warband_types::Priority;

/// Work items bucketed by priority level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityQueue<T> {
    buckets: [Vec<T>; Priority::COUNT],
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::blank()
    }
}

impl<T> PriorityQueue<T> {
    /// An empty queue with one bucket per level.
    pub fn blank() -> Self {
        Self {
            buckets: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Append `item` to the bucket for `priority`.
    pub fn enqueue(&mut self, priority: Priority, item: T) {
        if let Some(bucket) = self.buckets.get_mut(priority.index()) {
            bucket.push(item);
        }
    }

    /// Total number of queued items.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Whether every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Lazily remove every item, most urgent level first, insertion order
    /// within a level. Stopping early leaves levels not yet reached queued;
    /// the rest of a partly visited level is discarded.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.buckets.iter_mut().flat_map(std::mem::take)
    }

    /// Consume the queue into its ordered items.
    pub fn into_ordered(self) -> impl Iterator<Item = T> {
        self.buckets.into_iter().flatten()
    }
}

impl<T> Extend<(Priority, T)> for PriorityQueue<T> {
    fn extend<I: IntoIterator<Item = (Priority, T)>>(&mut self, iter: I) {
        for (priority, item) in iter {
            self.enqueue(priority, item);
        }
    }
}

impl<T> FromIterator<(Priority, T)> for PriorityQueue<T> {
    fn from_iter<I: IntoIterator<Item = (Priority, T)>>(iter: I) -> Self {
        let mut queue = Self::blank();
        queue.extend(iter);
        queue
    }
}
