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

//! Runs a script of `ADD_SERVER`/`REMOVE_SERVER`/`EDIT`/`GET` operations against a
//! [`docstore_core::LoadBalancer`] and prints the resulting transcript.

mod script;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use docstore_common::templates::render_host_lines;
use docstore_core::LoadBalancer;

use script::ScriptOp;

#[derive(Parser, Debug)]
#[command(name = "docstore", about = "runs a document-store script against a simulated cluster")]
struct Cli {
    /// Path to a script file of newline-delimited operations.
    script: PathBuf,

    /// Enable virtual nodes (3x replication) for every server added during this run.
    #[arg(long)]
    vnodes: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let contents = fs::read_to_string(&cli.script)
        .with_context(|| format!("reading script file {}", cli.script.display()))?;

    let mut lb = LoadBalancer::new(cli.vnodes);

    for (idx, raw_line) in contents.lines().enumerate() {
        let line = idx + 1;
        let op = script::parse_line(raw_line, line)
            .with_context(|| format!("{}:{line}", cli.script.display()))?;
        let Some(op) = op else { continue };
        run_op(&mut lb, op, line)?;
    }

    Ok(())
}

fn run_op(lb: &mut LoadBalancer, op: ScriptOp, line: usize) -> Result<()> {
    match op {
        ScriptOp::AddServer { id, cache_size } => {
            tracing::info!(line, id, cache_size, "ADD_SERVER");
            lb.add_server(id, cache_size);
        }
        ScriptOp::RemoveServer { id } => {
            tracing::info!(line, id, "REMOVE_SERVER");
            lb.remove_server(id);
        }
        ScriptOp::Edit { doc_name, doc_content } => {
            let resp = lb
                .handle_edit(&doc_name, &doc_content)
                .with_context(|| format!("{line}: EDIT {doc_name}"))?;
            println!(
                "{}",
                render_host_lines(resp.server_id, resp.response.as_deref().unwrap_or(""), &resp.log)
            );
        }
        ScriptOp::Get { doc_name } => {
            let resp = lb
                .handle_get(&doc_name)
                .with_context(|| format!("{line}: GET {doc_name}"))?;
            println!(
                "{}",
                render_host_lines(resp.server_id, resp.response.as_deref().unwrap_or(""), &resp.log)
            );
        }
    }
    Ok(())
}
