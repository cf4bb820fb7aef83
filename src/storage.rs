use std::collections::VecDeque;

/// Capabilities the queue engine needs from its backing container.
///
/// Elements are kept in insertion order: producers insert at the back,
/// consumers remove from the front or swap out the whole container at once.
/// Whole-container swaps go through [`std::mem::swap`], so the engine never
/// needs a swap method here.
///
/// `SUPPORTS_POP_FRONT` is explicit configuration, not auto-detection: it
/// records whether front removal is cheap for this container, and the engine
/// uses it to decide between waking one consumer and waking all of them after
/// a bulk insert. When in doubt, leave it `false`: over-signaling costs more
/// than a late wakeup under single-consumer draining.
pub trait YCQueueStorage {
    type Item;

    /// Whether `pop_front` is O(1) for this container.
    const SUPPORTS_POP_FRONT: bool;

    /// Insert every element of `items` at the back, preserving their order.
    fn append(&mut self, items: impl IntoIterator<Item = Self::Item>);

    /// Insert a single element at the back.
    fn push_back(&mut self, item: Self::Item);

    /// Remove and return the front element, or `None` when empty.
    fn pop_front(&mut self) -> Option<Self::Item>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every element, keeping any allocated capacity.
    fn clear(&mut self);

    /// Pre-allocate room for at least `additional` more elements.
    fn reserve(&mut self, additional: usize);
}

/// `Vec` is the right default for drain-heavy callers: `pop_all` swaps the
/// whole buffer out in O(1) and appends stay contiguous. `pop_front` works
/// but shifts the tail, so prefer [`VecDeque`] when consumers pop one
/// element at a time.
impl<T> YCQueueStorage for Vec<T> {
    type Item = T;

    const SUPPORTS_POP_FRONT: bool = false;

    fn append(&mut self, items: impl IntoIterator<Item = T>) {
        self.extend(items);
    }

    fn push_back(&mut self, item: T) {
        self.push(item);
    }

    fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.remove(0))
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional);
    }
}

impl<T> YCQueueStorage for VecDeque<T> {
    type Item = T;

    const SUPPORTS_POP_FRONT: bool = true;

    fn append(&mut self, items: impl IntoIterator<Item = T>) {
        self.extend(items);
    }

    fn push_back(&mut self, item: T) {
        VecDeque::push_back(self, item);
    }

    fn pop_front(&mut self) -> Option<T> {
        VecDeque::pop_front(self)
    }

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn clear(&mut self) {
        VecDeque::clear(self);
    }

    fn reserve(&mut self, additional: usize) {
        VecDeque::reserve(self, additional);
    }
}
