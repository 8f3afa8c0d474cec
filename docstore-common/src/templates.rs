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

//! Fixed log/response templates (§6).
//!
//! These are reproduced verbatim: they are the external protocol, not free-form diagnostics.
//! Internal crate diagnostics use `tracing` instead (see `docstore-cache` and `docstore-core`);
//! these templates are data returned to callers and printed by the host transcript renderer.

/// Maximum response length, in bytes, this system is required to support (§3).
pub const MAX_RESPONSE_BYTES: usize = 4096;

/// The bounded capacity of a server's [`TaskQueue`](crate)-equivalent (§4.3).
pub const TASK_QUEUE_CAPACITY: usize = 1000;

/// The store-to-cache capacity multiplier used when sizing a server's authoritative store (§3).
pub const STORE_CAPACITY_MULTIPLIER: usize = 1000;

/// Virtual node id offset for the first replica of a primary (§3).
pub const VNODE_OFFSET_1: u32 = 100_000;
/// Virtual node id offset for the second replica of a primary (§3).
pub const VNODE_OFFSET_2: u32 = 200_000;

/// `LOG_HIT(doc)`: "has cache entry for `<doc>`"
pub fn log_hit(doc: &str) -> String {
    format!("has cache entry for `{doc}`")
}

/// `LOG_MISS(doc)`: "cache miss; fetched `<doc>` from local database"
pub fn log_miss(doc: &str) -> String {
    format!("cache miss; fetched `{doc}` from local database")
}

/// `LOG_EVICT(doc, evicted)`: "cache miss; evicted `<ev>` and fetched `<doc>` from local database"
pub fn log_evict(doc: &str, evicted: &str) -> String {
    format!("cache miss; evicted `{evicted}` and fetched `{doc}` from local database")
}

/// `LOG_FAULT(doc)`: "document `<doc>` is neither in cache, nor in local database"
pub fn log_fault(doc: &str) -> String {
    format!("document `{doc}` is neither in cache, nor in local database")
}

/// `LOG_LAZY_EXEC(n)`: "task queue now has `<n>` pending operations"
pub fn log_lazy_exec(pending: usize) -> String {
    format!("task queue now has `{pending}` pending operations")
}

/// `MSG_A(op, doc)`: acknowledgement of a deferred operation.
pub fn msg_ack_deferred(op: &str, doc: &str) -> String {
    format!("request to {op} document `{doc}`")
}

/// `MSG_B(doc)`: "document `<doc>` edited successfully"
pub fn msg_edited(doc: &str) -> String {
    format!("document `{doc}` edited successfully")
}

/// `MSG_C(doc)`: "document `<doc>` created"
pub fn msg_created(doc: &str) -> String {
    format!("document `{doc}` created")
}

/// Renders the fixed host template of §6 for one response line pair.
pub fn render_host_lines(server_id: u32, response: &str, log: &str) -> String {
    format!("Server {server_id} has received {response}\nServer {server_id} {log}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_match_spec_verbatim() {
        assert_eq!(log_hit("a"), "has cache entry for `a`");
        assert_eq!(log_miss("a"), "cache miss; fetched `a` from local database");
        assert_eq!(
            log_evict("c", "a"),
            "cache miss; evicted `a` and fetched `c` from local database"
        );
        assert_eq!(log_fault("a"), "document `a` is neither in cache, nor in local database");
        assert_eq!(log_lazy_exec(3), "task queue now has `3` pending operations");
        assert_eq!(msg_edited("a"), "document `a` edited successfully");
        assert_eq!(msg_created("a"), "document `a` created");
    }
}
