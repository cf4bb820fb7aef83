#[cfg(test)]
mod single_thread_tests {
    use std::collections::VecDeque;
    use std::time::{Duration, Instant};

    use yep_drainq::YCUnboundedQueue;
    #[cfg(feature = "blocking")]
    use yep_drainq::YCBlockingQueue;
    #[cfg(feature = "dropping")]
    use yep_drainq::YCDroppingQueue;

    const SHORT_TIMEOUT: Duration = Duration::from_millis(10);

    #[test]
    /**
     * Push and append from one thread, then check that pop_one and pop_all
     * hand the elements back in exactly the order they went in.
     */
    fn fifo_order_across_mixed_inserts() {
        let queue = YCUnboundedQueue::<VecDeque<u32>>::new();

        queue.push(1);
        queue.append([2, 3, 4]);
        queue.push(5);

        assert_eq!(queue.pop_one(), 1);
        assert_eq!(queue.try_pop_one(), Some(2));
        assert_eq!(queue.pop_all(VecDeque::new()), [3, 4, 5]);
        assert!(queue.is_empty());
    }

    #[test]
    /**
     * Drive the drain cycle the way a worker loop does: keep handing the
     * container from the previous pop_all back in, and check the capacity
     * built up early on is never thrown away.
     */
    fn drain_cycle_reuses_storage_capacity() {
        let queue = YCUnboundedQueue::<Vec<u64>>::new();

        // capacity ping-pongs between the caller's container and the queue's:
        // the pre-sized buffer handed in on round 0 comes back on round 1,
        // and after the first round neither side ever needs to grow again
        let mut storage = Vec::with_capacity(1024);

        for round in 0..10u64 {
            queue.append(round * 100..round * 100 + 50);
            storage = queue.try_pop_all(storage);
            assert_eq!(storage.len(), 50);
            assert_eq!(storage[0], round * 100);

            if round == 1 {
                assert!(
                    storage.capacity() >= 1024,
                    "pre-sized storage was not returned by the swap cycle"
                );
            }
            if round >= 1 {
                assert!(
                    storage.capacity() >= 50,
                    "drain cycle shrank the reusable storage"
                );
            }
        }
    }

    #[test]
    fn timed_pops_report_absence_after_the_wait() {
        let queue = YCUnboundedQueue::<Vec<u32>>::new();

        let start = Instant::now();
        assert_eq!(queue.pop_one_timeout(SHORT_TIMEOUT), None);
        assert!(start.elapsed() >= SHORT_TIMEOUT);

        let start = Instant::now();
        let drained = queue.pop_all_timeout(SHORT_TIMEOUT, Vec::new());
        assert!(drained.is_empty());
        assert!(start.elapsed() >= SHORT_TIMEOUT);

        let deadline = Instant::now() + SHORT_TIMEOUT;
        assert_eq!(queue.pop_one_deadline(deadline), None);
        assert!(Instant::now() >= deadline);

        // a deadline already in the past reports absence immediately
        assert_eq!(queue.pop_one_deadline(Instant::now()), None);
    }

    #[test]
    fn clear_on_empty_queue_is_idempotent() {
        let queue = YCUnboundedQueue::<Vec<u32>>::new();
        queue.clear();
        queue.clear();
        assert!(queue.is_empty());

        queue.push(1);
        queue.clear();
        assert_eq!(queue.try_pop_one(), None);
    }

    #[test]
    fn reserve_prepares_room_for_bulk_append() {
        let queue = YCUnboundedQueue::<Vec<u32>>::new();
        queue.reserve(256);
        queue.append(0..256u32);
        assert_eq!(queue.len(), 256);

        let drained = queue.pop_all(Vec::new());
        assert!(drained.capacity() >= 256);
    }

    #[cfg(feature = "blocking")]
    #[test]
    fn blocking_queue_behaves_like_unbounded_below_capacity() {
        let queue = YCBlockingQueue::<VecDeque<&str>>::new(8);

        queue.push("hello there");
        queue.append(["general", "kenobi"]);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop_one(), "hello there");
        assert_eq!(queue.pop_all(VecDeque::new()), ["general", "kenobi"]);
    }

    #[cfg(feature = "blocking")]
    #[test]
    fn blocking_queue_timed_pops_expire() {
        let queue = YCBlockingQueue::<VecDeque<u32>>::new(4);

        let start = Instant::now();
        assert_eq!(queue.pop_one_timeout(SHORT_TIMEOUT), None);
        assert!(start.elapsed() >= SHORT_TIMEOUT);

        queue.push(1);
        assert_eq!(queue.pop_one_timeout(SHORT_TIMEOUT), Some(1));
    }

    #[cfg(feature = "dropping")]
    #[test]
    /**
     * The two overflow shapes of the dropping queue: an insert at capacity
     * sheds the whole backlog and reports it, an insert below capacity is
     * a plain append.
     */
    fn dropping_queue_overflow_scenarios() {
        let at_capacity = YCDroppingQueue::<Vec<&str>>::new(2);
        at_capacity.push("A");
        at_capacity.push("B");
        assert_eq!(at_capacity.push("C"), 2);
        assert_eq!(at_capacity.pop_all(Vec::new()), vec!["C"]);

        let below_capacity = YCDroppingQueue::<Vec<&str>>::new(2);
        below_capacity.push("A");
        assert_eq!(below_capacity.push("B"), 0);
        assert_eq!(below_capacity.pop_all(Vec::new()), vec!["A", "B"]);
    }

    #[cfg(feature = "dropping")]
    #[test]
    fn dropping_queue_timed_drain_sees_fresh_data_only() {
        let queue = YCDroppingQueue::<Vec<u32>>::new(3);
        queue.append([1, 2, 3]);
        queue.push(4);

        let drained = queue.pop_all_timeout(SHORT_TIMEOUT, Vec::new());
        assert_eq!(drained, vec![4]);

        let drained = queue.pop_all_timeout(SHORT_TIMEOUT, drained);
        assert!(drained.is_empty());
    }
}
