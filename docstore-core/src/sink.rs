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

//! Where drained responses go once they're computed (§6): the host transcript.

use docstore_common::templates::render_host_lines;

use crate::request::Response;

/// Receives every [`Response`] a server produces while draining, in order.
///
/// Kept as a trait rather than a bare `println!` so the CLI can wire up stdout while tests and
/// embedders can capture the transcript instead.
pub trait ResponseSink {
    fn emit(&mut self, response: &Response);
}

/// Prints each response using the fixed two-line host template of §6.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ResponseSink for StdoutSink {
    fn emit(&mut self, response: &Response) {
        println!(
            "{}",
            render_host_lines(
                response.server_id,
                response.response.as_deref().unwrap_or(""),
                &response.log,
            )
        );
    }
}

/// Records every response instead of printing it. Used by tests and by anything embedding the
/// balancer that wants the transcript as data.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub responses: Vec<Response>,
}

impl ResponseSink for RecordingSink {
    fn emit(&mut self, response: &Response) {
        self.responses.push(response.clone());
    }
}
