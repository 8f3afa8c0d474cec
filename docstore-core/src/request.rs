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

//! The two client-facing operations (§6) and the response shape a server hands back.

/// A client request. Neither variant names a server: ownership is decided purely by hashing
/// `doc_name` through the ring (§4.6.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Edit { doc_name: String, doc_content: String },
    Get { doc_name: String },
}

/// One line pair of the host transcript (§6): a log line and a response line, both attributed to
/// the server id that actually produced them.
///
/// `response` is `None` only for a `GET` of a document that is in neither the cache nor the store
/// (`LOG_FAULT`, §4.4): the log line still exists, but there is no document content to answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub server_id: u32,
    pub log: String,
    pub response: Option<String>,
}
