use std::sync::MutexGuard;
use std::time::{Duration, Instant};

use crate::queue_core::{YCOverflowPolicy, YCQueueCore};
use crate::storage::YCQueueStorage;

/// No capacity enforcement: every hook is a no-op.
struct UnboundedPolicy;

impl<S: YCQueueStorage> YCOverflowPolicy<S> for UnboundedPolicy {
    fn on_before_insert<'a>(&self, storage: MutexGuard<'a, S>) -> (MutexGuard<'a, S>, usize) {
        (storage, 0)
    }

    fn on_after_bulk_remove(&self, _previous_len: usize) {}

    fn on_after_single_remove(&self, _previous_len: usize) {}
}

/// MPMC queue limited only by available memory.
///
/// Producers never block on capacity (only on the queue lock itself), and
/// consumers drain either one element at a time or the whole buffer at once
/// with [`pop_all`](Self::pop_all). All operations take `&self`; share an
/// instance across threads with [`std::sync::Arc`] or scoped-thread borrows.
///
/// # Examples
/// ```
/// use yep_drainq::YCUnboundedQueue;
///
/// let queue = YCUnboundedQueue::<Vec<u32>>::new();
/// queue.push(1);
/// queue.append([2, 3]);
/// assert_eq!(queue.pop_all(Vec::new()), vec![1, 2, 3]);
/// ```
pub struct YCUnboundedQueue<S> {
    core: YCQueueCore<S, UnboundedPolicy>,
}

impl<S: YCQueueStorage + Default> YCUnboundedQueue<S> {
    pub fn new() -> Self {
        Self::with_storage(S::default())
    }
}

impl<S: YCQueueStorage + Default> Default for YCUnboundedQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: YCQueueStorage> YCUnboundedQueue<S> {
    /// Build a queue around pre-sized (or pre-filled) storage, so the first
    /// inserts don't pay for growth.
    pub fn with_storage(storage: S) -> Self {
        YCUnboundedQueue {
            core: YCQueueCore::new(storage, UnboundedPolicy),
        }
    }

    /// Insert every element of `items` in order, under a single lock
    /// acquisition.
    ///
    /// If you know you will be adding multiple elements, prefer this over
    /// per-element [`push`](Self::push): it takes one lock for the entire
    /// batch and lets the storage reserve all the space it needs up front.
    pub fn append<I>(&self, items: I)
    where
        I: IntoIterator<Item = S::Item>,
    {
        self.core.append(items);
    }

    /// Like [`append`](Self::append), but fails instead of waiting when the
    /// queue lock is currently held by another thread.
    ///
    /// # Returns
    /// `true` when the batch was inserted, `false` when the lock attempt
    /// failed (nothing is inserted in that case).
    pub fn non_blocking_append<I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = S::Item>,
    {
        self.core.non_blocking_append(items)
    }

    /// Insert a single element at the back of the queue.
    ///
    /// # Examples
    /// ```
    /// use yep_drainq::YCUnboundedQueue;
    ///
    /// let queue = YCUnboundedQueue::<Vec<&str>>::new();
    /// queue.push("hello there");
    /// assert_eq!(queue.len(), 1);
    /// ```
    pub fn push(&self, item: S::Item) {
        self.core.push(item);
    }

    /// Like [`push`](Self::push), but fails instead of waiting when the queue
    /// lock is currently held by another thread.
    pub fn non_blocking_push(&self, item: S::Item) -> bool {
        self.core.non_blocking_push(item)
    }

    /// Remove and return everything currently buffered, blocking until at
    /// least one element is present. The returned container is never empty.
    ///
    /// This gives the calling consumer the largest chunk of work possible in
    /// one critical section; the trade-off is that a multi-consumer setup
    /// makes no fairness attempt (one thread may get all the work).
    ///
    /// # Arguments
    /// * `storage` - Container whose capacity is reused for the drain; its
    ///   stale contents (if any) are cleared first. Passing the container
    ///   returned by the previous drain avoids reallocating every cycle.
    pub fn pop_all(&self, storage: S) -> S {
        self.core.pop_all(storage)
    }

    /// Timed [`pop_all`](Self::pop_all): waits at most `timeout` for data,
    /// then returns the (empty) storage if none arrived.
    pub fn pop_all_timeout(&self, timeout: Duration, storage: S) -> S {
        self.core.pop_all_timeout(timeout, storage)
    }

    /// [`pop_all`](Self::pop_all) bounded by an absolute deadline instead of
    /// a relative timeout.
    pub fn pop_all_deadline(&self, deadline: Instant, storage: S) -> S {
        self.core.pop_all_deadline(deadline, storage)
    }

    /// Non-waiting drain; may legitimately return an empty container.
    pub fn try_pop_all(&self, storage: S) -> S {
        self.core.try_pop_all(storage)
    }

    /// Remove and return the front element, blocking until one is present.
    pub fn pop_one(&self) -> S::Item {
        self.core.pop_one()
    }

    /// Timed [`pop_one`](Self::pop_one): `None` once `timeout` elapses with
    /// the queue still empty.
    pub fn pop_one_timeout(&self, timeout: Duration) -> Option<S::Item> {
        self.core.pop_one_timeout(timeout)
    }

    /// [`pop_one`](Self::pop_one) bounded by an absolute deadline.
    pub fn pop_one_deadline(&self, deadline: Instant) -> Option<S::Item> {
        self.core.pop_one_deadline(deadline)
    }

    /// Non-waiting [`pop_one`](Self::pop_one): `None` when the queue is
    /// currently empty.
    ///
    /// # Examples
    /// ```
    /// use yep_drainq::YCUnboundedQueue;
    ///
    /// let queue = YCUnboundedQueue::<Vec<u32>>::new();
    /// assert_eq!(queue.try_pop_one(), None);
    /// queue.push(5);
    /// assert_eq!(queue.try_pop_one(), Some(5));
    /// ```
    pub fn try_pop_one(&self) -> Option<S::Item> {
        self.core.try_pop_one()
    }

    /// Discard everything currently buffered.
    pub fn clear(&self) {
        self.core.clear();
    }

    /// Pre-allocate room for at least `additional` more elements.
    pub fn reserve(&self, additional: usize) {
        self.core.reserve(additional);
    }

    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[test]
    fn push_then_pop_all_preserves_order() {
        let queue = YCUnboundedQueue::<Vec<u32>>::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);

        assert_eq!(queue.pop_all(Vec::new()), vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn append_and_pop_one_interleave_in_order() {
        let queue = YCUnboundedQueue::<VecDeque<u32>>::new();
        queue.append([10, 20]);
        queue.push(30);

        assert_eq!(queue.pop_one(), 10);
        assert_eq!(queue.try_pop_one(), Some(20));
        assert_eq!(queue.pop_one(), 30);
        assert_eq!(queue.try_pop_one(), None);
    }

    #[test]
    fn pop_one_timeout_expires_on_silent_queue() {
        let queue = YCUnboundedQueue::<Vec<u32>>::new();

        let start = Instant::now();
        let timeout = Duration::from_millis(10);
        assert_eq!(queue.pop_one_timeout(timeout), None);
        assert!(
            start.elapsed() >= timeout,
            "timed pop returned before the timeout elapsed"
        );
    }

    #[test]
    fn try_pop_all_on_empty_queue_returns_empty_storage() {
        let queue = YCUnboundedQueue::<Vec<u32>>::new();
        let drained = queue.try_pop_all(Vec::with_capacity(8));
        assert!(drained.is_empty());

        // the capacity we handed in lives on inside the queue and comes back
        // out with the next swap
        let drained = queue.try_pop_all(drained);
        assert!(drained.is_empty());
        assert!(drained.capacity() >= 8);
    }

    #[test]
    fn with_storage_keeps_prefilled_elements() {
        let queue = YCUnboundedQueue::with_storage(vec![1u32, 2]);
        queue.push(3);
        assert_eq!(queue.pop_all(Vec::new()), vec![1, 2, 3]);
    }

    #[test]
    fn reserve_and_len_forward_under_lock() {
        let queue = YCUnboundedQueue::<Vec<u32>>::new();
        queue.reserve(128);
        assert_eq!(queue.len(), 0);
        queue.append(0..5u32);
        assert_eq!(queue.len(), 5);
    }
}
