use crate::json_tree::{flatten, ExpandPolicy, TreeRow};
use ragview_core::conversation::{render, Alignment, RenderOptions, RenderTree};
use ragview_core::transcript::Transcript;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub render: RenderOptions,
    pub expand: ExpandPolicy,
    /// Print panel bodies instead of collapsed titles
    pub open_panels: bool,
    pub busy: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            expand: ExpandPolicy::ROOT_ONLY,
            open_panels: false,
            busy: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationExport {
    pub source: String,
    pub total_messages: usize,
    pub total_panels: usize,
    pub tree: RenderTree,
    pub lines: Vec<String>,
}

pub fn export_conversation(
    source: &str,
    transcript: &Transcript,
    options: &ExportOptions,
) -> ConversationExport {
    let mut tree = render(
        &transcript.messages,
        transcript.busy || options.busy,
        &options.render,
    );
    if options.open_panels {
        for panel in tree.entries.iter_mut().flat_map(|entry| entry.panels.iter_mut()) {
            panel.collapsed = false;
        }
    }
    let lines = export_lines(&tree, options.expand);
    ConversationExport {
        source: source.to_string(),
        total_messages: tree.entries.len(),
        total_panels: tree.panel_count(),
        tree,
        lines,
    }
}

/// Plain-text transcript: `>>` marks outgoing turns, `<<` incoming ones.
pub fn export_lines(tree: &RenderTree, expand: ExpandPolicy) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(empty) = &tree.empty_state {
        lines.push(format!("-- {}", empty.headline));
        lines.push(format!("   {}", empty.hint));
    }

    for entry in &tree.entries {
        let marker = match entry.alignment {
            Alignment::Outgoing => ">>",
            Alignment::Incoming => "<<",
        };
        let mut header = format!("{marker} {}", entry.role.as_str());
        if !entry.time_label.is_empty() {
            header.push(' ');
            header.push_str(&entry.time_label);
        }
        lines.push(header);
        for content_line in entry.content.lines() {
            lines.push(format!("   {content_line}"));
        }
        for panel in &entry.panels {
            let marker = if panel.collapsed { "▸" } else { "▾" };
            lines.push(format!("   {marker} {}", panel.kind.title()));
            if !panel.collapsed {
                lines.extend(
                    flatten(&panel.body, expand)
                        .iter()
                        .map(|row| format!("     {}", TreeRow::to_plain(row))),
                );
            }
        }
    }

    if let Some(busy) = &tree.busy_indicator {
        lines.push(format!(".. {}", busy.label));
    }

    lines
}
