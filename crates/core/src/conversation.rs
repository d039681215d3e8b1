//! Per-message view state for a conversation thread.
//!
//! [`render`] walks the message list once, in order, and derives for each
//! turn its alignment, time label and evidence panels. Nothing is cached:
//! every call recomputes from the inputs.

use crate::evidence::{evidence_panels, EvidencePanel};
use crate::message::{Message, Role};
use crate::time_label::{format_time_label, TimeLabelZone};
use serde::Serialize;

pub const EMPTY_STATE_HEADLINE: &str = "Ask about your PDF";
pub const EMPTY_STATE_HINT: &str = "Upload a document, then type a question below.";
pub const BUSY_LABEL: &str = "Thinking…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Rewrite arrays as index-keyed objects before display
    pub show_array_indexes: bool,
    pub time_zone: TimeLabelZone,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_array_indexes: true,
            time_zone: TimeLabelZone::Local,
        }
    }
}

/// Bubble placement: outgoing (right) for user turns, incoming (left) for
/// assistant turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Outgoing,
    Incoming,
}

impl Alignment {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::User => Self::Outgoing,
            Role::Assistant => Self::Incoming,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    pub id: String,
    pub role: Role,
    pub alignment: Alignment,
    pub content: String,
    /// Empty when the timestamp cannot be formatted
    pub time_label: String,
    pub panels: Vec<EvidencePanel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub headline: &'static str,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusyIndicator {
    pub label: &'static str,
}

/// View description handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderTree {
    /// Shown whenever there are no messages, regardless of `busy`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<EmptyState>,
    pub entries: Vec<MessageView>,
    /// Trailing "assistant is composing" row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy_indicator: Option<BusyIndicator>,
}

impl RenderTree {
    pub fn panel_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.panels.len()).sum()
    }
}

pub fn render(messages: &[Message], busy: bool, options: &RenderOptions) -> RenderTree {
    let empty_state = messages.is_empty().then_some(EmptyState {
        headline: EMPTY_STATE_HEADLINE,
        hint: EMPTY_STATE_HINT,
    });

    let entries = messages
        .iter()
        .map(|message| render_message(message, options))
        .collect();

    RenderTree {
        empty_state,
        entries,
        busy_indicator: busy.then_some(BusyIndicator { label: BUSY_LABEL }),
    }
}

pub fn render_message(message: &Message, options: &RenderOptions) -> MessageView {
    MessageView {
        id: message.id.clone(),
        role: message.role,
        alignment: Alignment::for_role(message.role),
        content: message.content.clone(),
        time_label: format_time_label(message.created_at, options.time_zone),
        panels: message_panels(message, options.show_array_indexes),
    }
}

fn message_panels(message: &Message, show_array_indexes: bool) -> Vec<EvidencePanel> {
    let Some(meta) = message.meta.as_ref() else {
        return Vec::new();
    };
    match message.role {
        Role::Assistant => evidence_panels(meta, show_array_indexes),
        Role::User => {
            tracing::debug!(message_id = %message.id, "ignoring evidence attached to a user turn");
            Vec::new()
        }
    }
}
