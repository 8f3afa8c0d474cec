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

//! The recency-order slot: an index-based stand-in for the teacher's intrusive `NonNull<Handle>`.
//!
//! `foyer-memory`'s eviction containers splice raw, intrusive pointers embedded in each cache
//! entry. This system is single-threaded and has no concurrent readers holding a handle across an
//! await point, so there is no need for that unsafety: a slot index into a dense arena gives the
//! same O(1)-splice guarantee (the "stable handle into the recency sequence" the design notes
//! call for) without `unsafe`.

/// A node in the doubly-linked recency order, stored in a dense arena (see [`crate::lru::Cache`]).
#[derive(Debug)]
pub(crate) struct Slot<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl<K, V> Slot<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }
}
