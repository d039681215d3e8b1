use crate::app::{App, PanelKey};
use crate::json_tree::{flatten, ExpandPolicy, TreeRow};
use crate::theme::{self, Theme};
use ragview_core::conversation::{Alignment as Side, MessageView, RenderTree};
use ragview_core::evidence::EvidencePanel;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(frame: &mut Frame, app: &mut App) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let tree = app.render_tree();
    render_header(frame, app, &tree, header_area);
    render_conversation(frame, app, &tree, body_area);
    render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, app: &App, tree: &RenderTree, area: Rect) {
    let mut spans = vec![
        Span::styled(" ragview ", Style::new().fg(Theme::ACCENT_BLUE).bold()),
        Span::styled(
            app.source.display().to_string(),
            Style::new().fg(Theme::TEXT_SECONDARY),
        ),
        Span::styled(
            format!(
                "  {} messages · {} panels · depth {}",
                tree.entries.len(),
                tree.panel_count(),
                app.expand.depth
            ),
            Style::new().fg(Theme::TEXT_MUTED),
        ),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("  {status}"),
            Style::new().fg(Theme::ACCENT_YELLOW),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_conversation(frame: &mut Frame, app: &mut App, tree: &RenderTree, area: Rect) {
    let block = Theme::block().title(" Conversation ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let selected = app.selected_panel_key(tree);
    let layout = conversation_lines(tree, selected.as_ref(), app.expand, inner.width);
    app.viewport_height = inner.height;

    let total = saturating_u16(layout.lines.len());
    let max_scroll = total.saturating_sub(inner.height);
    app.scroll = scroll_offset(app.scroll, layout.selected_row, total, inner.height);

    frame.render_widget(Paragraph::new(layout.lines).scroll((app.scroll, 0)), inner);

    if total > inner.height {
        let mut state = ScrollbarState::new(max_scroll as usize).position(app.scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut state,
        );
    }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints: [(&str, &str); 7] = [
        ("j/k", "scroll"),
        ("Tab", "panel"),
        ("Enter", "toggle"),
        ("+/-", "depth"),
        ("i", if app.render_options.show_array_indexes { "raw arrays" } else { "indexes" }),
        ("b", "busy"),
        ("q", "quit"),
    ];
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, desc) in hints {
        spans.push(Span::styled(
            format!(" {key}"),
            Style::new().fg(Theme::TEXT_KEY).bold(),
        ));
        spans.push(Span::styled(
            format!(" {desc} "),
            Style::new().fg(Theme::TEXT_KEY_DESC),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn saturating_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Scroll position that keeps the selected row visible, clamped to the content.
fn scroll_offset(current: u16, selected_row: Option<usize>, total: u16, height: u16) -> u16 {
    let mut scroll = current;
    if let Some(row) = selected_row.map(saturating_u16) {
        if row < scroll {
            scroll = row;
        } else if row >= scroll.saturating_add(height) {
            scroll = row.saturating_sub(height.saturating_sub(1));
        }
    }
    scroll.min(total.saturating_sub(height))
}

pub struct ConversationLines {
    pub lines: Vec<Line<'static>>,
    /// Line index of the selected panel header, if any
    pub selected_row: Option<usize>,
}

/// Lay out the whole conversation as styled lines for a given width.
pub fn conversation_lines(
    tree: &RenderTree,
    selected: Option<&PanelKey>,
    policy: ExpandPolicy,
    width: u16,
) -> ConversationLines {
    let mut lines = Vec::new();
    let mut selected_row = None;

    if let Some(empty) = &tree.empty_state {
        lines.push(Line::default());
        lines.push(
            Line::from(Span::styled(
                empty.headline,
                Style::new().fg(Theme::TEXT_PRIMARY).bold(),
            ))
            .centered(),
        );
        lines.push(
            Line::from(Span::styled(empty.hint, Style::new().fg(Theme::TEXT_MUTED))).centered(),
        );
        lines.push(Line::default());
    }

    let bubble_width = bubble_width(width);
    for entry in &tree.entries {
        push_message(&mut lines, entry, bubble_width);
        for panel in &entry.panels {
            let is_selected = selected
                .is_some_and(|key| key.message_id == entry.id && key.kind == panel.kind);
            if is_selected {
                selected_row = Some(lines.len());
            }
            push_panel(&mut lines, panel, is_selected, policy);
        }
        lines.push(Line::default());
    }

    if let Some(busy) = &tree.busy_indicator {
        lines.push(Line::from(vec![
            Span::styled("● ", Style::new().fg(Theme::ACCENT_BLUE)),
            Span::styled(busy.label, Style::new().fg(Theme::TEXT_SECONDARY).italic()),
        ]));
    }

    ConversationLines {
        lines,
        selected_row,
    }
}

fn push_message(lines: &mut Vec<Line<'static>>, entry: &MessageView, bubble_width: usize) {
    let alignment = match entry.alignment {
        Side::Outgoing => Alignment::Right,
        Side::Incoming => Alignment::Left,
    };

    let mut header = vec![Span::styled(
        theme::role_label(entry.role),
        Style::new().fg(theme::role_color(entry.role)).bold(),
    )];
    if !entry.time_label.is_empty() {
        header.push(Span::styled(
            format!(" · {}", entry.time_label),
            Style::new().fg(Theme::TEXT_MUTED),
        ));
    }
    lines.push(Line::from(header).alignment(alignment));

    for row in wrap_text(&entry.content, bubble_width) {
        lines.push(
            Line::from(Span::styled(row, Style::new().fg(Theme::TEXT_CONTENT))).alignment(alignment),
        );
    }
}

fn push_panel(
    lines: &mut Vec<Line<'static>>,
    panel: &EvidencePanel,
    selected: bool,
    policy: ExpandPolicy,
) {
    let marker = if panel.collapsed { "▸" } else { "▾" };
    let title_style = if selected {
        Style::new().fg(Theme::ACCENT_BLUE).bold()
    } else {
        Style::new().fg(Theme::TEXT_SECONDARY)
    };
    lines.push(Line::from(vec![
        Span::styled(
            if selected { "> " } else { "  " },
            Style::new().fg(Theme::ACCENT_BLUE),
        ),
        Span::styled(format!("{marker} {}", panel.kind.title()), title_style),
    ]));

    if panel.collapsed {
        return;
    }
    for row in flatten(&panel.body, policy) {
        lines.push(tree_row_line(&row));
    }
}

fn tree_row_line(row: &TreeRow) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("    {}", "  ".repeat(row.level)))];
    if let Some(key) = &row.key {
        spans.push(Span::styled(
            format!("{key}: "),
            Style::new().fg(Theme::JSON_KEY),
        ));
    }
    spans.push(Span::styled(
        row.text.clone(),
        Style::new().fg(theme::tree_value_color(row.kind)),
    ));
    Line::from(spans)
}

/// Bubbles take at most 80% of the available width.
fn bubble_width(width: u16) -> usize {
    ((width as usize) * 4 / 5).max(10)
}

/// Greedy word wrap that keeps explicit line breaks and measures display width.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0usize;
        for word in paragraph.split(' ') {
            let word_width = word.width();
            let sep = usize::from(!current.is_empty());
            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }
        out.push(current);
    }
    out
}
