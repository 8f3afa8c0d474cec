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

//! The consistent-hash ring (C5): servers (and, optionally, their virtual nodes) placed by hash
//! on a circle, with lookups landing on the nearest entry at or after a query hash.

/// One placement on the ring.
///
/// A primary server's own entry has `primary_id == id`. A virtual node (`id == primary_id +
/// 100_000` or `+ 200_000`, §3) carries its own `hash` but resolves to `primary_id` for every
/// purpose except "which id gets reported back to the caller" (§4.6.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingEntry {
    pub id: u32,
    pub hash: u32,
    pub primary_id: u32,
}

impl RingEntry {
    pub fn primary(id: u32, hash: u32) -> Self {
        Self { id, hash, primary_id: id }
    }

    pub fn is_primary(&self) -> bool {
        self.id == self.primary_id
    }
}

/// The ring itself: entries sorted by `(hash, id)` so that a successor lookup is a binary search.
///
/// The source this system is modeled on manually doubles/halves a fixed-size array as servers
/// join and leave. A `Vec`'s amortized growth already gives the same behavior idiomatically, so
/// `reserve`/`shrink_to_fit` stand in for that bookkeeping (see `DESIGN.md`).
#[derive(Debug, Default)]
pub struct Ring {
    entries: Vec<RingEntry>,
}

impl Ring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RingEntry] {
        &self.entries
    }

    /// Reserves room for `additional` more entries without reallocating.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    /// Releases slack capacity once live entries fall below half of what's allocated.
    pub fn shrink_if_sparse(&mut self) {
        if self.entries.capacity() > 0 && self.entries.len() < self.entries.capacity() / 2 {
            self.entries.shrink_to_fit();
        }
    }

    /// Inserts `entry`, keeping the ring sorted by `(hash, id)`. Returns the index it landed at.
    pub fn insert(&mut self, entry: RingEntry) -> usize {
        let pos = self
            .entries
            .partition_point(|e| (e.hash, e.id) < (entry.hash, entry.id));
        self.entries.insert(pos, entry);
        pos
    }

    /// Removes the entry with the given `id`, if present.
    pub fn remove_id(&mut self, id: u32) -> Option<RingEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }

    /// The index of the entry that owns hash `q`: the first entry with `hash >= q`, wrapping to
    /// index 0 if `q` is past every entry's hash (C5's "wraps to index 0" rule).
    pub fn successor_index(&self, q: u32) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let pos = self.entries.partition_point(|e| e.hash < q);
        Some(if pos < self.entries.len() { pos } else { 0 })
    }

    /// The entry that owns hash `q`.
    pub fn successor(&self, q: u32) -> Option<RingEntry> {
        self.successor_index(q).map(|i| self.entries[i])
    }

    /// Walks forward from `q`'s successor (wrapping at most once around the whole ring) for the
    /// first entry whose `primary_id` differs from `exclude_primary`. Used during server removal
    /// to find the live neighbor that should inherit a departing server's keys (§4.6.2).
    pub fn successor_excluding(&self, q: u32, exclude_primary: u32) -> Option<RingEntry> {
        let n = self.entries.len();
        if n == 0 {
            return None;
        }
        let start = self.successor_index(q)?;
        (0..n)
            .map(|offset| self.entries[(start + offset) % n])
            .find(|e| e.primary_id != exclude_primary)
    }
}
