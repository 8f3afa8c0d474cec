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

//! Stable, non-cryptographic hashes used to place keys and servers on the ring (C1).
//!
//! Ring placement depends on these functions producing the exact same output on every host and
//! every run, so neither may use a randomized seed (unlike `ahash`/`RandomState`, which are the
//! right choice everywhere else in this workspace but the wrong choice here).

/// Jenkins' one-at-a-time hash over a document name.
///
/// Used for everything keyed by document name: cache/store lookups and ring routing.
pub fn hash_string(s: &str) -> u32 {
    let mut hash: u32 = 0;
    for &b in s.as_bytes() {
        hash = hash.wrapping_add(b as u32);
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    hash
}

/// MurmurHash3's 32-bit integer finalizer, used to place a server id on the ring.
///
/// Deliberately a different algorithm family from [`hash_string`]: the spec requires the two
/// hashes to be distinct so that a server id and a document name never collide by construction.
pub fn hash_uint(u: u32) -> u32 {
    let mut h = u;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_string_is_deterministic() {
        assert_eq!(hash_string("hello"), hash_string("hello"));
        assert_ne!(hash_string("hello"), hash_string("world"));
    }

    #[test]
    fn hash_uint_is_deterministic() {
        assert_eq!(hash_uint(42), hash_uint(42));
        assert_ne!(hash_uint(1), hash_uint(2));
    }

    #[test]
    fn hash_string_and_hash_uint_are_distinct_algorithms() {
        // Same numeric identity fed through both paths should not reliably agree; this is not a
        // formal proof of independence but catches an accidental copy-paste of one into the other.
        let n = 12345u32;
        assert_ne!(hash_string(&n.to_string()), hash_uint(n));
    }

    #[test]
    fn hash_string_empty() {
        // Jenkins one-at-a-time of the empty string is 0 by construction.
        assert_eq!(hash_string(""), 0);
    }
}
