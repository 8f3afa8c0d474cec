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

//! The error taxonomy of §7 that is actually representable as a `Result` in safe Rust.
//!
//! `AllocationFailure` has no counterpart here (the allocator aborts on our behalf); `QueueOverflow`,
//! `DocumentMiss`, and `UnknownServer` are ordinary `bool`/`Option` return values per §7, not
//! variants of this enum.

use thiserror::Error;

/// Errors surfaced by the core distributed state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Routing was attempted against a ring with no entries (§7's `EmptyRing`).
    ///
    /// A well-formed script never triggers this: it can only arise from a `GET`/`EDIT` issued
    /// before any `ADD_SERVER`.
    #[error("cannot route request: the ring has no servers")]
    EmptyRing,

    /// A script line could not be parsed into a known operation.
    #[error("line {line}: {reason}")]
    MalformedScriptLine { line: usize, reason: String },
}
