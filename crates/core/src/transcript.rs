//! Conversation transcript files.
//!
//! Three layouts are accepted:
//! ```text
//! [ {message}, {message}, ... ]                  JSON array
//! { "messages": [ ... ], "busy": false }         JSON document
//! {message}\n{message}\n...                      JSONL, one message per line
//! ```
//! A lone message object, even pretty-printed over several lines, is a
//! one-message conversation. An empty file is an empty conversation.

use crate::message::Message;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::io::{self, Read};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    pub messages: Vec<Message>,
    /// Whether an assistant answer is still pending
    pub busy: bool,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TranscriptError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error at line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
    #[error("invalid transcript document: {0}")]
    Document(#[source] serde_json::Error),
    #[error("duplicate message id: {id}")]
    DuplicateId { id: String },
}

#[derive(Deserialize)]
struct TranscriptDocument {
    messages: Vec<Message>,
    #[serde(default)]
    busy: bool,
}

pub fn load_transcript(path: &Path) -> Result<Transcript, TranscriptError> {
    let file = std::fs::File::open(path)?;
    read_transcript(file)
}

pub fn read_transcript<R: Read>(mut reader: R) -> Result<Transcript, TranscriptError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_transcript(&input)
}

pub fn parse_transcript(input: &str) -> Result<Transcript, TranscriptError> {
    let trimmed = input.trim_start();
    let transcript = if trimmed.is_empty() {
        Transcript::default()
    } else if trimmed.starts_with('[') {
        Transcript {
            messages: serde_json::from_str(input).map_err(TranscriptError::Document)?,
            busy: false,
        }
    } else {
        match serde_json::from_str::<Value>(input) {
            Ok(Value::Object(map)) if map.contains_key("messages") => {
                let document: TranscriptDocument = serde_json::from_value(Value::Object(map))
                    .map_err(TranscriptError::Document)?;
                Transcript {
                    messages: document.messages,
                    busy: document.busy,
                }
            }
            Ok(Value::Object(map)) => Transcript {
                messages: vec![
                    serde_json::from_value(Value::Object(map)).map_err(TranscriptError::Document)?,
                ],
                busy: false,
            },
            _ => Transcript {
                messages: parse_jsonl(input)?,
                busy: false,
            },
        }
    };

    ensure_unique_ids(&transcript.messages)?;
    Ok(transcript)
}

fn parse_jsonl(input: &str) -> Result<Vec<Message>, TranscriptError> {
    let mut messages = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let message = serde_json::from_str(line).map_err(|source| TranscriptError::Json {
            line: index + 1,
            source,
        })?;
        messages.push(message);
    }
    Ok(messages)
}

fn ensure_unique_ids(messages: &[Message]) -> Result<(), TranscriptError> {
    let mut seen = HashSet::new();
    for message in messages {
        if !seen.insert(message.id.as_str()) {
            return Err(TranscriptError::DuplicateId {
                id: message.id.clone(),
            });
        }
    }
    Ok(())
}
