//! Drain-optimized MPMC queues with pluggable overflow policies.
//!
//! Three variants share one mutex + condition-variable engine and differ only
//! in how they handle a full queue: grow without bound, block the producer,
//! or shed the backlog. All of them are optimized for a consumer that drains
//! the entire buffer per request via `pop_all` rather than polling
//! element-by-element.

/// storage backends the queues buffer into and drain out of
pub mod storage;
pub use storage::YCQueueStorage;

/// the shared lock + notify engine behind every queue variant
mod queue_core;

/// queue limited only by available memory
pub mod unbounded_queue;
pub use unbounded_queue::YCUnboundedQueue;

/// bounded queue that applies backpressure to producers (optional feature)
#[cfg(feature = "blocking")]
pub mod blocking_queue;
#[cfg(feature = "blocking")]
pub use blocking_queue::YCBlockingQueue;

/// bounded queue that sheds its backlog on overflow (optional feature)
#[cfg(feature = "dropping")]
pub mod dropping_queue;
#[cfg(feature = "dropping")]
pub use dropping_queue::YCDroppingQueue;
