use std::sync::{Condvar, MutexGuard};
use std::time::{Duration, Instant};

use crate::queue_core::{YCOverflowPolicy, YCQueueCore};
use crate::storage::YCQueueStorage;

/// Backpressure policy: producers park on `not_full` until a removal makes
/// room. Both condition variables in play (this one and the engine's
/// not-empty one) pair with the same storage mutex.
struct BlockingPolicy {
    max_size: usize,
    not_full: Condvar,
}

impl<S: YCQueueStorage> YCOverflowPolicy<S> for BlockingPolicy {
    fn on_before_insert<'a>(&self, storage: MutexGuard<'a, S>) -> (MutexGuard<'a, S>, usize) {
        let storage = self
            .not_full
            .wait_while(storage, |storage| storage.len() >= self.max_size)
            .unwrap();
        (storage, 0)
    }

    fn on_after_bulk_remove(&self, previous_len: usize) {
        if previous_len >= self.max_size {
            // an arbitrary amount of capacity may have freed up, so every
            // parked producer gets a chance to re-check
            self.not_full.notify_all();
        }
    }

    fn on_after_single_remove(&self, previous_len: usize) {
        if previous_len >= self.max_size {
            // exactly one unit of capacity freed, wake exactly one producer
            self.not_full.notify_one();
        }
    }
}

/// Bounded MPMC queue that applies backpressure to producers.
///
/// The queue holds at most [`max_size`](Self::max_size) elements. A producer
/// calling [`push`](Self::push) or [`append`](Self::append) on a full queue
/// blocks until a consumer removes enough elements; consumers block on an
/// empty queue the same way the unbounded variant does. This makes the queue
/// a natural rate-limiter between fast producers and a slower consumer.
///
/// One caveat on batches: the capacity wait is for a single free slot, so an
/// `append` of several elements may briefly push the size past `max_size`
/// until the next drain. Per-element `push` never exceeds it.
///
/// # Examples
/// ```
/// use std::collections::VecDeque;
/// use yep_drainq::YCBlockingQueue;
///
/// let queue = YCBlockingQueue::<VecDeque<u32>>::new(2);
/// queue.push(1);
/// queue.push(2);
/// assert_eq!(queue.len(), queue.max_size());
///
/// // a third push would now block until something is removed
/// assert_eq!(queue.pop_one(), 1);
/// queue.push(3);
/// assert_eq!(queue.pop_all(VecDeque::new()), [2, 3]);
/// ```
pub struct YCBlockingQueue<S> {
    core: YCQueueCore<S, BlockingPolicy>,
}

impl<S: YCQueueStorage + Default> YCBlockingQueue<S> {
    /// Create a queue that admits at most `max_size` buffered elements.
    ///
    /// # Panics
    /// Panics when `max_size` is zero: every producer would block forever.
    pub fn new(max_size: usize) -> Self {
        Self::with_storage(max_size, S::default())
    }
}

impl<S: YCQueueStorage> YCBlockingQueue<S> {
    /// Like [`new`](Self::new), but wraps pre-sized (or pre-filled) storage.
    pub fn with_storage(max_size: usize, storage: S) -> Self {
        assert!(max_size > 0, "max_size must be greater than zero");

        YCBlockingQueue {
            core: YCQueueCore::new(
                storage,
                BlockingPolicy {
                    max_size,
                    not_full: Condvar::new(),
                },
            ),
        }
    }

    /// The capacity threshold producers block against.
    pub fn max_size(&self) -> usize {
        self.core.policy().max_size
    }

    /// Insert every element of `items` in order under one lock acquisition,
    /// first waiting for the queue to dip below [`max_size`](Self::max_size).
    ///
    /// Prefer this over per-element [`push`](Self::push) when inserting
    /// several elements: one lock, one capacity wait, one storage reserve.
    ///
    /// # Arguments
    /// * `items` - Elements to insert; their relative order is preserved.
    pub fn append<I>(&self, items: I)
    where
        I: IntoIterator<Item = S::Item>,
    {
        self.core.append(items);
    }

    /// Like [`append`](Self::append), but gives up when the queue lock is
    /// currently held by another thread.
    ///
    /// Note this only skips the lock wait. If the lock is acquired and the
    /// queue is full, the call still blocks for capacity like
    /// [`append`](Self::append) does.
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

    /// Insert a single element, waiting for capacity if the queue is full.
    ///
    /// # Examples
    /// ```
    /// use yep_drainq::YCBlockingQueue;
    ///
    /// let queue = YCBlockingQueue::<Vec<u32>>::new(4);
    /// queue.push(7);
    /// assert_eq!(queue.try_pop_one(), Some(7));
    /// ```
    pub fn push(&self, item: S::Item) {
        self.core.push(item);
    }

    /// Like [`push`](Self::push), but gives up when the queue lock is
    /// currently held by another thread. The capacity wait still applies
    /// once the lock is held.
    pub fn non_blocking_push(&self, item: S::Item) -> bool {
        self.core.non_blocking_push(item)
    }

    /// Remove and return everything currently buffered, blocking until at
    /// least one element is present, and waking producers that were blocked
    /// on a full queue. The returned container is never empty.
    ///
    /// # Arguments
    /// * `storage` - Container whose capacity is reused for the drain; its
    ///   stale contents (if any) are cleared first.
    pub fn pop_all(&self, storage: S) -> S {
        self.core.pop_all(storage)
    }

    /// Timed [`pop_all`](Self::pop_all): waits at most `timeout` for data,
    /// then returns the (empty) storage if none arrived.
    pub fn pop_all_timeout(&self, timeout: Duration, storage: S) -> S {
        self.core.pop_all_timeout(timeout, storage)
    }

    /// [`pop_all`](Self::pop_all) bounded by an absolute deadline.
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
    pub fn try_pop_one(&self) -> Option<S::Item> {
        self.core.try_pop_one()
    }

    /// Discard everything currently buffered. Producers blocked on a full
    /// queue are woken, since all capacity just freed up.
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
