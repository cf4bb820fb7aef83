use std::sync::{Condvar, Mutex, MutexGuard, TryLockError};
use std::time::{Duration, Instant};

use crate::storage::YCQueueStorage;

/// Hooks a queue variant installs into [`YCQueueCore`] to customize overflow
/// behavior. Every hook runs while the engine's storage lock is held.
///
/// `on_before_insert` takes the guard and gives it back so a policy can park
/// the producer on its own condition variable (releasing the storage lock
/// while asleep) before the insert happens. It reports how many buffered
/// elements it discarded to make room, zero for policies that never discard.
///
/// The removal hooks receive the storage length from just before the removal
/// so capacity-waiting producers can be woken exactly when a full queue
/// stops being full.
pub(crate) trait YCOverflowPolicy<S: YCQueueStorage> {
    fn on_before_insert<'a>(&self, storage: MutexGuard<'a, S>) -> (MutexGuard<'a, S>, usize);

    fn on_after_bulk_remove(&self, previous_len: usize);

    fn on_after_single_remove(&self, previous_len: usize);
}

/// The locking and notification engine shared by every queue variant.
///
/// One mutex serializes every storage access; a "not empty" condition
/// variable parks consumers. Policy-specific behavior (capacity checks,
/// backpressure, shedding) is delegated to the [`YCOverflowPolicy`] hooks so
/// all variants share a single synchronization path.
pub(crate) struct YCQueueCore<S, P> {
    storage: Mutex<S>,
    not_empty: Condvar,
    policy: P,
}

impl<S, P> YCQueueCore<S, P>
where
    S: YCQueueStorage,
    P: YCOverflowPolicy<S>,
{
    pub(crate) fn new(storage: S, policy: P) -> Self {
        YCQueueCore {
            storage: Mutex::new(storage),
            not_empty: Condvar::new(),
            policy,
        }
    }

    pub(crate) fn policy(&self) -> &P {
        &self.policy
    }

    /// Insert a batch under one lock acquisition. Returns the policy's
    /// dropped-element count.
    pub(crate) fn append<I>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = S::Item>,
    {
        let guard = self.storage.lock().unwrap();
        self.insert_locked(guard, true, |storage| storage.append(items))
    }

    /// Like [`append`](Self::append), but gives up immediately when another
    /// thread holds the storage lock. Returns whether the batch was inserted.
    pub(crate) fn non_blocking_append<I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = S::Item>,
    {
        let Some(guard) = self.try_lock_storage() else {
            return false;
        };
        // the dropped count is not reported on this path
        self.insert_locked(guard, true, |storage| storage.append(items));
        true
    }

    pub(crate) fn push(&self, item: S::Item) -> usize {
        let guard = self.storage.lock().unwrap();
        self.insert_locked(guard, false, |storage| storage.push_back(item))
    }

    pub(crate) fn non_blocking_push(&self, item: S::Item) -> bool {
        let Some(guard) = self.try_lock_storage() else {
            return false;
        };
        self.insert_locked(guard, false, |storage| storage.push_back(item));
        true
    }

    /// Swap out the entire buffered contents, waiting until at least one
    /// element is present. Never returns an empty container.
    pub(crate) fn pop_all(&self, storage: S) -> S {
        self.pop_all_locked(self.wait_for_data(), storage)
    }

    /// Timed [`pop_all`](Self::pop_all): returns the (cleared) storage
    /// unchanged if nothing arrives within `timeout`.
    pub(crate) fn pop_all_timeout(&self, timeout: Duration, storage: S) -> S {
        self.pop_all_locked(self.wait_for_data_timeout(timeout), storage)
    }

    pub(crate) fn pop_all_deadline(&self, deadline: Instant, storage: S) -> S {
        self.pop_all_timeout(deadline.saturating_duration_since(Instant::now()), storage)
    }

    /// Non-waiting [`pop_all`](Self::pop_all); may legitimately return an
    /// empty container.
    pub(crate) fn try_pop_all(&self, storage: S) -> S {
        self.pop_all_locked(self.storage.lock().unwrap(), storage)
    }

    /// Remove the front element, waiting until one is present.
    pub(crate) fn pop_one(&self) -> S::Item {
        self.pop_one_locked(self.wait_for_data())
    }

    pub(crate) fn pop_one_timeout(&self, timeout: Duration) -> Option<S::Item> {
        let guard = self.wait_for_data_timeout(timeout);
        if guard.is_empty() {
            return None;
        }
        Some(self.pop_one_locked(guard))
    }

    pub(crate) fn pop_one_deadline(&self, deadline: Instant) -> Option<S::Item> {
        self.pop_one_timeout(deadline.saturating_duration_since(Instant::now()))
    }

    pub(crate) fn try_pop_one(&self) -> Option<S::Item> {
        let guard = self.storage.lock().unwrap();
        if guard.is_empty() {
            return None;
        }
        Some(self.pop_one_locked(guard))
    }

    /// Discard everything buffered. Runs the bulk-removal hook, so producers
    /// parked on a full queue get woken even though nothing was popped.
    pub(crate) fn clear(&self) {
        let mut guard = self.storage.lock().unwrap();
        let previous_len = guard.len();
        guard.clear();
        self.policy.on_after_bulk_remove(previous_len);
    }

    pub(crate) fn reserve(&self, additional: usize) {
        self.storage.lock().unwrap().reserve(additional);
    }

    pub(crate) fn len(&self) -> usize {
        self.storage.lock().unwrap().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.storage.lock().unwrap().is_empty()
    }

    fn try_lock_storage(&self) -> Option<MutexGuard<'_, S>> {
        match self.storage.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::WouldBlock) => None,
            Err(TryLockError::Poisoned(err)) => panic!("queue storage mutex poisoned: {err}"),
        }
    }

    fn insert_locked(
        &self,
        guard: MutexGuard<'_, S>,
        adding_several: bool,
        insert: impl FnOnce(&mut S),
    ) -> usize {
        let (mut guard, dropped) = self.policy.on_before_insert(guard);
        let was_empty = guard.is_empty();
        insert(&mut guard);
        drop(guard);

        /*
         * Notifying after the unlock is safe. A consumer's empty-check and its
         * sleep are one atomic step performed under the lock, and every insert
         * mutates storage while holding that same lock. So either the consumer
         * observes the new data and never sleeps, or it is already asleep by
         * the time this signal fires; an insert cannot slip into the gap
         * between check and sleep.
         */
        if was_empty {
            if adding_several && S::SUPPORTS_POP_FRONT {
                // several consumers can each take a share from the front
                self.not_empty.notify_all();
            } else {
                self.not_empty.notify_one();
            }
        }

        dropped
    }

    fn wait_for_data(&self) -> MutexGuard<'_, S> {
        let guard = self.storage.lock().unwrap();
        self.not_empty
            .wait_while(guard, |storage| storage.is_empty())
            .unwrap()
    }

    fn wait_for_data_timeout(&self, timeout: Duration) -> MutexGuard<'_, S> {
        let guard = self.storage.lock().unwrap();
        let (guard, _timed_out) = self
            .not_empty
            .wait_timeout_while(guard, timeout, |storage| storage.is_empty())
            .unwrap();
        guard
    }

    /// lock must be held; swaps the caller's storage with the queue contents
    fn pop_all_locked(&self, mut guard: MutexGuard<'_, S>, mut storage: S) -> S {
        // reuse the caller's capacity, never its leftover contents
        storage.clear();
        let previous_len = guard.len();
        std::mem::swap(&mut *guard, &mut storage);
        self.policy.on_after_bulk_remove(previous_len);
        drop(guard);
        storage
    }

    /// lock must be held and storage must be non-empty
    fn pop_one_locked(&self, mut guard: MutexGuard<'_, S>) -> S::Item {
        let previous_len = guard.len();
        let item = guard
            .pop_front()
            .expect("pop_one_locked called with empty storage");
        self.policy.on_after_single_remove(previous_len);
        drop(guard);
        item
    }
}
