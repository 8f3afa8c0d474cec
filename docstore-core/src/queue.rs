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

//! The per-server lazy-edit queue (C3): a bounded FIFO of deferred edits, drained to consistency
//! before any read or topology change touches the server's store.

use std::collections::VecDeque;

use docstore_common::templates::TASK_QUEUE_CAPACITY;

/// One deferred `EDIT`, waiting to be applied to a server's cache/store pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTask {
    pub doc_name: String,
    pub doc_content: String,
}

/// A bounded FIFO queue of [`EditTask`]s (§4.3). Enqueue past capacity silently drops the task
/// (`QueueOverflow`, §7) rather than erroring: overflow is a valid, expected steady-state outcome
/// under sustained load, not a programmer error.
#[derive(Debug)]
pub struct TaskQueue {
    capacity: usize,
    tasks: VecDeque<EditTask>,
}

impl TaskQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            tasks: VecDeque::with_capacity(capacity.min(64)),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Enqueues `task`, returning `false` (and dropping it) if the queue is already at capacity.
    pub fn enqueue(&mut self, task: EditTask) -> bool {
        if self.tasks.len() >= self.capacity {
            return false;
        }
        self.tasks.push_back(task);
        true
    }

    pub fn dequeue(&mut self) -> Option<EditTask> {
        self.tasks.pop_front()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new(TASK_QUEUE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(n: u32) -> EditTask {
        EditTask {
            doc_name: format!("doc-{n}"),
            doc_content: format!("content-{n}"),
        }
    }

    #[test]
    fn fifo_order() {
        let mut q = TaskQueue::new(4);
        q.enqueue(task(1));
        q.enqueue(task(2));
        assert_eq!(q.dequeue(), Some(task(1)));
        assert_eq!(q.dequeue(), Some(task(2)));
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn enqueue_past_capacity_is_dropped_silently() {
        let mut q = TaskQueue::new(2);
        assert!(q.enqueue(task(1)));
        assert!(q.enqueue(task(2)));
        assert!(!q.enqueue(task(3)));
        assert_eq!(q.len(), 2);
        assert_eq!(q.dequeue(), Some(task(1)));
    }
}
