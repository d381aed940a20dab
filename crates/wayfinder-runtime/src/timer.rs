#![forbid(unsafe_code)]

//! Deterministic timer queue.
//!
//! Stands in for the browser's macrotask timers (`setTimeout`). The host
//! advances time explicitly and the owner pops whatever became due.
//!
//! # Invariants
//!
//! 1. Timers fire in deadline order; equal deadlines fire in scheduling order.
//! 2. A cancelled timer never fires.
//! 3. [`TimerQueue::pop_due`] never returns a timer whose deadline is after `now`.

use web_time::Duration;

/// Handle returned by [`TimerQueue::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TimerId,
    due: Duration,
    payload: T,
}

/// Ordered collection of pending timers carrying payloads of type `T`.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    // Kept sorted by (due, id); queues here hold a handful of entries.
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Schedule `payload` to fire at `due`.
    pub fn schedule(&mut self, due: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let index = self.entries.partition_point(|entry| entry.due <= due);
        self.entries.insert(index, Entry { id, due, payload });
        id
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Cancel every timer whose payload matches `predicate`. Returns the count.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !predicate(&entry.payload));
        before - self.entries.len()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pop the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        if self.entries.first()?.due > now {
            return None;
        }
        let entry = self.entries.remove(0);
        Some((entry.due, entry.payload))
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|entry| entry.due)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pending payloads in firing order.
    pub fn iter(&self) -> impl Iterator<Item = (Duration, &T)> + '_ {
        self.entries.iter().map(|entry| (entry.due, &entry.payload))
    }
}
