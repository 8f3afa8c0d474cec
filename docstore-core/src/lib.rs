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

//! The distributed document store: a server per cluster node (C3), a consistent-hash ring with
//! optional virtual nodes (C5), and the load balancer that routes through both (C4).

mod balancer;
mod queue;
mod request;
mod ring;
mod server;
mod sink;

pub use balancer::LoadBalancer;
pub use request::{Request, Response};
pub use ring::{Ring, RingEntry};
pub use sink::{RecordingSink, ResponseSink, StdoutSink};
