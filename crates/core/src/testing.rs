use crate::{EvidenceBundle, Message};
use serde_json::Value;

/// Assistant turn carrying the given evidence, timestamped at the epoch.
pub fn assistant_with(
    id: &str,
    retrieved: Option<&[&[&str]]>,
    reranked_ids: Option<&[i64]>,
    retrieval_raw: Option<Value>,
) -> Message {
    Message::assistant(id, format!("answer {id}"), 0).with_meta(EvidenceBundle {
        retrieved: retrieved.map(|rows| {
            rows.iter()
                .map(|row| row.iter().map(|chunk| chunk.to_string()).collect())
                .collect()
        }),
        reranked_ids: reranked_ids.map(<[i64]>::to_vec),
        retrieval_raw,
    })
}

/// User turn with a generated id.
pub fn user(text: &str) -> Message {
    Message::user(format!("user-{}", next_id()), text, 0)
}

fn next_id() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}
