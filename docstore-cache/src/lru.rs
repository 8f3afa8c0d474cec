//  Copyright 2024 docstore contributors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

use std::hash::Hash;

use ahash::RandomState;
use hashbrown::HashMap;

use crate::handle::Slot;

/// A bounded, recency-ordered cache with an eviction callback surfaced through `put`'s return
/// value (C2).
///
/// Used both as the small hot cache in front of a server's store, and — sized `capacity * 1000`
/// — as the server's authoritative store itself (§3). Every `put`/`get`/`remove` is O(1)
/// amortized: the index in `index` is a stable handle into the `slots` arena, so recency splice
/// never scans (see `handle.rs`).
pub struct Cache<K, V> {
    capacity: usize,
    index: HashMap<K, usize, RandomState>,
    slots: Vec<Option<Slot<K, V>>>,
    free: Vec<usize>,
    /// Least-recently-used end of the recency order.
    front: Option<usize>,
    /// Most-recently-used end of the recency order.
    back: Option<usize>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Builds a cache with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`: per §4.2, `N == 0` is not a supported configuration.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "lru cache capacity must be >= 1");
        Self {
            capacity,
            index: HashMap::with_capacity_and_hasher(capacity, RandomState::default()),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            front: None,
            back: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// `is_full()` (§4.2): `|mapping| == N`.
    pub fn is_full(&self) -> bool {
        self.index.len() == self.capacity
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// `get(key) -> value?` (§4.2): on a hit, moves `key` to the back of the recency order.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.detach(idx);
        self.push_back(idx);
        Some(&self.slots[idx].as_ref().expect("indexed slot is live").value)
    }

    /// `put(key, value) -> evicted_key?` (§4.2 / I3 / I4).
    pub fn put(&mut self, key: K, value: V) -> Option<K> {
        if let Some(&idx) = self.index.get(&key) {
            let slot = self.slots[idx].as_mut().expect("indexed slot is live");
            slot.value = value;
            self.detach(idx);
            self.push_back(idx);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict_front()
        } else {
            None
        };

        let idx = self.alloc(Slot::new(key.clone(), value));
        self.index.insert(key, idx);
        self.push_back(idx);

        evicted
    }

    /// `remove(key)` (§4.2): removes from both structures; no-op if absent.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        self.detach(idx);
        let slot = self.slots[idx].take().expect("indexed slot is live");
        self.free.push(idx);
        Some(slot.value)
    }

    /// Iterates keys from least- to most-recently-used, without touching recency order.
    pub fn keys_lru_order(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates (key, value) pairs from least- to most-recently-used, without touching recency
    /// order. Used to snapshot a store's full contents for multiset comparisons across topology
    /// changes.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        LruIter {
            cache: self,
            cursor: self.front,
        }
    }

    fn alloc(&mut self, slot: Slot<K, V>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(slot);
            idx
        } else {
            self.slots.push(Some(slot));
            self.slots.len() - 1
        }
    }

    fn evict_front(&mut self) -> Option<K> {
        let idx = self.front?;
        self.detach(idx);
        let slot = self.slots[idx].take().expect("front slot is live");
        self.free.push(idx);
        self.index.remove(&slot.key);
        tracing::trace!(idx, "lru eviction at capacity");
        Some(slot.key)
    }

    /// Unlinks `idx` from the recency order. Does not touch `index` or `slots[idx]`'s contents.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = {
            let slot = self.slots[idx].as_ref().expect("live slot");
            (slot.prev, slot.next)
        };
        match prev {
            Some(p) => self.slots[p].as_mut().expect("live slot").next = next,
            None => self.front = next,
        }
        match next {
            Some(n) => self.slots[n].as_mut().expect("live slot").prev = prev,
            None => self.back = prev,
        }
        let slot = self.slots[idx].as_mut().expect("live slot");
        slot.prev = None;
        slot.next = None;
    }

    /// Links `idx` in as the new back (most-recently-used) of the recency order.
    fn push_back(&mut self, idx: usize) {
        let old_back = self.back;
        {
            let slot = self.slots[idx].as_mut().expect("live slot");
            slot.prev = old_back;
            slot.next = None;
        }
        if let Some(b) = old_back {
            self.slots[b].as_mut().expect("live slot").next = Some(idx);
        } else {
            self.front = Some(idx);
        }
        self.back = Some(idx);
    }
}

struct LruIter<'a, K, V> {
    cache: &'a Cache<K, V>,
    cursor: Option<usize>,
}

impl<'a, K, V> Iterator for LruIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let slot = self.cache.slots[idx].as_ref().expect("live slot");
        self.cursor = slot.next;
        Some((&slot.key, &slot.value))
    }
}
