//! Order Tracker Module
//!
//! Maintains the key ordering the eviction policies select victims from.
//!
//! The deque doubles as insertion order and recency order: every insert
//! pushes the key to the front, and the store additionally moves a key to
//! the front on read only under the LRU policy. For FIFO, LFU and TTL
//! caches the order therefore stays pure insertion order, which is exactly
//! what their victim selection and tie-breaks are defined over.

use std::collections::VecDeque;

// == Order Tracker ==
/// Tracks key order for eviction.
///
/// Front = newest (most recently inserted/used), back = oldest.
#[derive(Debug)]
pub struct OrderTracker<K> {
    order: VecDeque<K>,
}

impl<K: PartialEq + Clone> OrderTracker<K> {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record Insert ==
    /// Adds a key at the newest position.
    ///
    /// The store guarantees the key is not already tracked (a `put` over an
    /// existing key removes the old entry first).
    pub fn record_insert(&mut self, key: K) {
        self.order.push_front(key);
    }

    // == Touch ==
    /// Moves a key to the newest position (LRU recency update).
    pub fn touch(&mut self, key: &K) {
        self.remove(key);
        self.order.push_front(key.clone());
    }

    // == Remove ==
    /// Removes a key from the tracker, if present.
    pub fn remove(&mut self, key: &K) {
        self.order.retain(|k| k != key);
    }

    // == Oldest ==
    /// The oldest tracked key, or None when empty.
    pub fn oldest(&self) -> Option<&K> {
        self.order.back()
    }

    // == Iterate Oldest First ==
    /// Iterates keys from oldest to newest. LFU victim scans use this so
    /// that a strict minimum comparison lands on the oldest entry among
    /// access-count ties.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &K> {
        self.order.iter().rev()
    }

    // == Clear ==
    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<K: PartialEq + Clone> Default for OrderTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
