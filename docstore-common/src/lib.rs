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

//! Shared constants, hashing, and error types for the docstore workspace.

pub mod error;
pub mod hash;
pub mod templates;

pub use error::CoreError;
pub use hash::{hash_string, hash_uint};
pub use templates::{
    log_evict, log_fault, log_hit, log_lazy_exec, log_miss, msg_ack_deferred, msg_created, msg_edited,
    render_host_lines, MAX_RESPONSE_BYTES, STORE_CAPACITY_MULTIPLIER, TASK_QUEUE_CAPACITY, VNODE_OFFSET_1,
    VNODE_OFFSET_2,
};
