//! Flattened JSON tree rows for evidence panels.
//!
//! The widget only labels object keys; arrays handed in raw render their
//! items without positions. Expansion is decided per nesting level by
//! [`ExpandPolicy`], never by content.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandPolicy {
    /// Levels below this are expanded; 1 means "root only".
    pub depth: usize,
}

impl ExpandPolicy {
    pub const ROOT_ONLY: Self = Self { depth: 1 };

    pub fn expands(&self, level: usize) -> bool {
        level < self.depth
    }

    pub fn deeper(self) -> Self {
        Self {
            depth: self.depth.saturating_add(1),
        }
    }

    pub fn shallower(self) -> Self {
        Self {
            depth: self.depth.saturating_sub(1),
        }
    }
}

impl Default for ExpandPolicy {
    fn default() -> Self {
        Self::ROOT_ONLY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Open,
    Close,
    Collapsed,
    String,
    Number,
    Bool,
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub level: usize,
    pub key: Option<String>,
    pub text: String,
    pub kind: RowKind,
}

impl TreeRow {
    /// Indented `key: value` text.
    pub fn to_plain(&self) -> String {
        let indent = "  ".repeat(self.level);
        match &self.key {
            Some(key) => format!("{indent}{key}: {}", self.text),
            None => format!("{indent}{}", self.text),
        }
    }
}

pub fn flatten(value: &Value, policy: ExpandPolicy) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    push_node(&mut rows, None, value, 0, policy);
    rows
}

fn push_node(
    rows: &mut Vec<TreeRow>,
    key: Option<&str>,
    value: &Value,
    level: usize,
    policy: ExpandPolicy,
) {
    let key = key.map(str::to_string);
    match value {
        Value::Object(map) => {
            if !policy.expands(level) {
                rows.push(TreeRow {
                    level,
                    key,
                    text: format!("{{…}} {}", count_label(map.len(), "key", "keys")),
                    kind: RowKind::Collapsed,
                });
                return;
            }
            rows.push(TreeRow {
                level,
                key,
                text: "{".to_string(),
                kind: RowKind::Open,
            });
            for (child_key, child) in map {
                push_node(rows, Some(child_key), child, level + 1, policy);
            }
            rows.push(close_row(level, "}"));
        }
        Value::Array(items) => {
            if !policy.expands(level) {
                rows.push(TreeRow {
                    level,
                    key,
                    text: format!("[…] {}", count_label(items.len(), "item", "items")),
                    kind: RowKind::Collapsed,
                });
                return;
            }
            rows.push(TreeRow {
                level,
                key,
                text: "[".to_string(),
                kind: RowKind::Open,
            });
            for item in items {
                push_node(rows, None, item, level + 1, policy);
            }
            rows.push(close_row(level, "]"));
        }
        Value::String(text) => rows.push(TreeRow {
            level,
            key,
            text: Value::String(text.clone()).to_string(),
            kind: RowKind::String,
        }),
        Value::Number(number) => rows.push(TreeRow {
            level,
            key,
            text: number.to_string(),
            kind: RowKind::Number,
        }),
        Value::Bool(flag) => rows.push(TreeRow {
            level,
            key,
            text: flag.to_string(),
            kind: RowKind::Bool,
        }),
        Value::Null => rows.push(TreeRow {
            level,
            key,
            text: "null".to_string(),
            kind: RowKind::Null,
        }),
    }
}

fn close_row(level: usize, bracket: &str) -> TreeRow {
    TreeRow {
        level,
        key: None,
        text: bracket.to_string(),
        kind: RowKind::Close,
    }
}

fn count_label(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {plural}")
    }
}
