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

//! A single server: its hot cache, its authoritative store, and its lazy-edit queue (§3, §4.4).

use docstore_cache::Cache;
use docstore_common::hash::hash_uint;
use docstore_common::templates::{
    log_evict, log_fault, log_hit, log_lazy_exec, log_miss, msg_ack_deferred, msg_created,
    msg_edited, STORE_CAPACITY_MULTIPLIER, TASK_QUEUE_CAPACITY,
};

use crate::queue::{EditTask, TaskQueue};
use crate::request::{Request, Response};

/// One node of the cluster (§3): a `cache`-sized hot cache backed by a much larger `store`, and a
/// queue of edits that haven't been applied to either yet.
pub struct Server {
    id: u32,
    hash: u32,
    cache: Cache<String, String>,
    store: Cache<String, String>,
    queue: TaskQueue,
}

impl Server {
    pub fn new(id: u32, cache_size: usize) -> Self {
        Self {
            id,
            hash: hash_uint(id),
            cache: Cache::new(cache_size),
            store: Cache::new(cache_size * STORE_CAPACITY_MULTIPLIER),
            queue: TaskQueue::new(TASK_QUEUE_CAPACITY),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub(crate) fn store(&self) -> &Cache<String, String> {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut Cache<String, String> {
        &mut self.store
    }

    pub(crate) fn cache_mut(&mut self) -> &mut Cache<String, String> {
        &mut self.cache
    }

    /// A recency-order-independent snapshot of this server's authoritative store, as (key,
    /// value) pairs. Used by [`crate::balancer::LoadBalancer::store_snapshot`] to check
    /// round-trip properties across topology changes.
    pub(crate) fn store_snapshot(&self) -> std::collections::BTreeMap<String, String> {
        self.store.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Dispatches one request per the tables in §4.4. `EDIT` only ever enqueues; `GET` drains the
    /// queue first, handing each drained edit's response to `on_drain_response` before computing
    /// its own.
    pub fn handle_request<F>(&mut self, req: &Request, on_drain_response: F) -> Response
    where
        F: FnMut(Response),
    {
        match req {
            Request::Edit { doc_name, doc_content } => {
                self.queue.enqueue(EditTask {
                    doc_name: doc_name.clone(),
                    doc_content: doc_content.clone(),
                });
                Response {
                    server_id: self.id,
                    log: log_lazy_exec(self.queue.len()),
                    response: Some(msg_ack_deferred("EDIT", doc_name)),
                }
            }
            Request::Get { doc_name } => {
                self.drain(on_drain_response);
                let (log, response) = self.get_document(doc_name);
                Response {
                    server_id: self.id,
                    log,
                    response,
                }
            }
        }
    }

    /// Applies every queued edit in order, handing each resulting [`Response`] to `on_response`.
    ///
    /// Used both for the read-triggered drain of §4.4 (where `on_response` prints to the host
    /// transcript) and for the silent pre-rebalance drain of §4.6 (where it is a no-op).
    pub fn drain<F>(&mut self, mut on_response: F)
    where
        F: FnMut(Response),
    {
        while let Some(task) = self.queue.dequeue() {
            let (log, text) = self.edit_document(&task.doc_name, &task.doc_content);
            on_response(Response {
                server_id: self.id,
                log,
                response: Some(text),
            });
        }
    }

    /// Applies one edit to cache and store, per the table in §4.4.
    fn edit_document(&mut self, doc_name: &str, doc_content: &str) -> (String, String) {
        let key = doc_name.to_string();
        if self.cache.contains_key(&key) {
            self.cache.put(key.clone(), doc_content.to_string());
            self.store.put(key, doc_content.to_string());
            return (log_hit(doc_name), msg_edited(doc_name));
        }
        if self.store.contains_key(&key) {
            let evicted = self.cache.put(key.clone(), doc_content.to_string());
            self.store.put(key, doc_content.to_string());
            let log = match evicted {
                Some(ev) => log_evict(doc_name, &ev),
                None => log_miss(doc_name),
            };
            return (log, msg_edited(doc_name));
        }
        self.store.put(key.clone(), doc_content.to_string());
        let evicted = self.cache.put(key, doc_content.to_string());
        let log = match evicted {
            Some(ev) => log_evict(doc_name, &ev),
            None => log_miss(doc_name),
        };
        (log, msg_created(doc_name))
    }

    /// Reads one document, per the table in §4.4.
    fn get_document(&mut self, doc_name: &str) -> (String, Option<String>) {
        let key = doc_name.to_string();
        if let Some(v) = self.cache.get(&key) {
            return (log_hit(doc_name), Some(v.clone()));
        }
        if let Some(v) = self.store.get(&key).cloned() {
            let evicted = self.cache.put(key, v.clone());
            let log = match evicted {
                Some(ev) => log_evict(doc_name, &ev),
                None => log_miss(doc_name),
            };
            return (log, Some(v));
        }
        (log_fault(doc_name), None)
    }
}
