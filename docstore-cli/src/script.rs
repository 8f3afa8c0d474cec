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

//! Parses the newline-delimited script grammar a docstore run is driven by (§10.4).

use docstore_common::error::CoreError;

/// One parsed line of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOp {
    AddServer { id: u32, cache_size: usize },
    RemoveServer { id: u32 },
    Edit { doc_name: String, doc_content: String },
    Get { doc_name: String },
}

/// Parses one script line. Blank lines and lines starting with `#` parse to `None`.
///
/// `line` is 1-based, used only to attribute [`CoreError::MalformedScriptLine`].
pub fn parse_line(raw: &str, line: usize) -> Result<Option<ScriptOp>, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let keyword = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or("").trim_start();

    let malformed = |reason: &str| CoreError::MalformedScriptLine { line, reason: reason.to_string() };

    match keyword {
        "ADD_SERVER" => {
            let mut args = rest.split_whitespace();
            let id = args
                .next()
                .ok_or_else(|| malformed("ADD_SERVER requires <id> <cache_size>"))?
                .parse::<u32>()
                .map_err(|_| malformed("ADD_SERVER <id> must be an unsigned integer"))?;
            let cache_size = args
                .next()
                .ok_or_else(|| malformed("ADD_SERVER requires <id> <cache_size>"))?
                .parse::<usize>()
                .map_err(|_| malformed("ADD_SERVER <cache_size> must be a positive integer"))?;
            Ok(Some(ScriptOp::AddServer { id, cache_size }))
        }
        "REMOVE_SERVER" => {
            let id = rest
                .split_whitespace()
                .next()
                .ok_or_else(|| malformed("REMOVE_SERVER requires <id>"))?
                .parse::<u32>()
                .map_err(|_| malformed("REMOVE_SERVER <id> must be an unsigned integer"))?;
            Ok(Some(ScriptOp::RemoveServer { id }))
        }
        "EDIT" => {
            let mut args = rest.splitn(2, char::is_whitespace);
            let doc_name = args
                .next()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| malformed("EDIT requires <doc_name> <doc_content>"))?
                .to_string();
            let doc_content = args.next().unwrap_or("").trim_start().to_string();
            Ok(Some(ScriptOp::Edit { doc_name, doc_content }))
        }
        "GET" => {
            let doc_name = rest
                .split_whitespace()
                .next()
                .ok_or_else(|| malformed("GET requires <doc_name>"))?
                .to_string();
            Ok(Some(ScriptOp::Get { doc_name }))
        }
        other => Err(malformed(&format!("unknown operation `{other}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        assert_eq!(parse_line("", 1).unwrap(), None);
        assert_eq!(parse_line("   ", 2).unwrap(), None);
        assert_eq!(parse_line("# a comment", 3).unwrap(), None);
    }

    #[test]
    fn parses_add_and_remove_server() {
        assert_eq!(
            parse_line("ADD_SERVER 1 16", 1).unwrap(),
            Some(ScriptOp::AddServer { id: 1, cache_size: 16 })
        );
        assert_eq!(
            parse_line("REMOVE_SERVER 1", 1).unwrap(),
            Some(ScriptOp::RemoveServer { id: 1 })
        );
    }

    #[test]
    fn parses_edit_with_multi_word_content() {
        assert_eq!(
            parse_line("EDIT report.txt quarterly numbers look good", 1).unwrap(),
            Some(ScriptOp::Edit {
                doc_name: "report.txt".into(),
                doc_content: "quarterly numbers look good".into(),
            })
        );
    }

    #[test]
    fn parses_get() {
        assert_eq!(
            parse_line("GET report.txt", 1).unwrap(),
            Some(ScriptOp::Get { doc_name: "report.txt".into() })
        );
    }

    #[test]
    fn rejects_unknown_operation() {
        let err = parse_line("FROB 1", 5).unwrap_err();
        assert_eq!(
            err,
            CoreError::MalformedScriptLine { line: 5, reason: "unknown operation `FROB`".into() }
        );
    }

    #[test]
    fn rejects_missing_arguments() {
        assert!(parse_line("ADD_SERVER 1", 1).is_err());
        assert!(parse_line("GET", 1).is_err());
    }
}
