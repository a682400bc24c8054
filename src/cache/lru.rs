//! Recency List Module
//!
//! Implements the ordering sequence behind the cache: a doubly-linked list
//! stored in a slot arena, so nodes keep a stable handle while they move.

use std::fmt;

/// Null link marker.
const SENTINEL: usize = usize::MAX;

// == Handle ==
/// Stable position of a node inside a [`RecencyList`].
///
/// A handle stays valid until its node is removed. Afterwards the slot may be
/// recycled for a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

#[derive(Debug)]
struct Slot<T> {
    item: Option<T>,
    prev: usize,
    next: usize,
}

// == Recency List ==
/// Doubly-linked list ordered by recency of use.
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Push-front, move-to-front and removal are O(1). Freed slots are threaded
/// onto a free list through their `next` field and reused by later pushes.
pub struct RecencyList<T> {
    slots: Vec<Slot<T>>,
    head: usize,
    tail: usize,
    free_head: usize,
    len: usize,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: SENTINEL,
            tail: SENTINEL,
            free_head: SENTINEL,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts `item` as the most recently used node and returns its handle.
    pub fn push_front(&mut self, item: T) -> Handle {
        let idx = self.alloc_slot(item);
        self.link_front(idx);
        self.len += 1;
        Handle(idx)
    }

    // == Move To Front ==
    /// Marks the node at `handle` as most recently used.
    ///
    /// Does nothing if the handle does not refer to a live node.
    pub fn move_to_front(&mut self, handle: Handle) {
        let idx = handle.0;
        if !self.is_live(idx) || self.head == idx {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    // == Remove ==
    /// Unlinks the node at `handle` and returns its item.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let idx = handle.0;
        if !self.is_live(idx) {
            return None;
        }
        self.unlink(idx);
        let item = self.slots[idx].item.take();

        self.slots[idx].next = self.free_head;
        self.free_head = idx;
        self.len -= 1;

        item
    }

    // == Back ==
    /// Returns the handle of the least recently used node.
    pub fn back(&self) -> Option<Handle> {
        (self.tail != SENTINEL).then_some(Handle(self.tail))
    }

    // == Front ==
    /// Returns the handle of the most recently used node.
    #[cfg(test)]
    fn front(&self) -> Option<Handle> {
        (self.head != SENTINEL).then_some(Handle(self.head))
    }

    // == Pop Back ==
    /// Removes and returns the least recently used item.
    pub fn pop_back(&mut self) -> Option<T> {
        let handle = self.back()?;
        self.remove(handle)
    }

    // == Accessors ==
    /// Returns the item at `handle`, if live.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.0).and_then(|slot| slot.item.as_ref())
    }

    /// Returns a mutable reference to the item at `handle`, if live.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots.get_mut(handle.0).and_then(|slot| slot.item.as_mut())
    }

    // == Length ==
    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every node and releases all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = SENTINEL;
        self.tail = SENTINEL;
        self.free_head = SENTINEL;
        self.len = 0;
    }

    // == Iter ==
    /// Iterates items from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
            remaining: self.len,
        }
    }

    fn is_live(&self, idx: usize) -> bool {
        self.slots.get(idx).is_some_and(|slot| slot.item.is_some())
    }

    fn alloc_slot(&mut self, item: T) -> usize {
        let slot = Slot {
            item: Some(item),
            prev: SENTINEL,
            next: SENTINEL,
        };
        if self.free_head != SENTINEL {
            let idx = self.free_head;
            self.free_head = self.slots[idx].next;
            self.slots[idx] = slot;
            idx
        } else {
            self.slots.push(slot);
            self.slots.len() - 1
        }
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev;
        let next = self.slots[idx].next;

        if prev != SENTINEL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }

        if next != SENTINEL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.slots[idx].prev = SENTINEL;
        self.slots[idx].next = SENTINEL;
    }

    fn link_front(&mut self, idx: usize) {
        self.slots[idx].prev = SENTINEL;
        self.slots[idx].next = self.head;

        if self.head != SENTINEL {
            self.slots[self.head].prev = idx;
        }
        self.head = idx;

        if self.tail == SENTINEL {
            self.tail = idx;
        }
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RecencyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// == Iterator ==
/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    current: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == SENTINEL {
            return None;
        }
        let slot = &self.list.slots[self.current];
        self.current = slot.next;
        self.remaining -= 1;
        slot.item.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
