use crate::json_tree::RowKind;
use ragview_core::Role;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType};

pub struct Theme;

impl Theme {
    // ── Border ───────────────────────────────────────────────────────
    pub const BORDER_NORMAL: Color = Color::Rgb(60, 65, 80);

    // ── Text hierarchy ───────────────────────────────────────────────
    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_SECONDARY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_MUTED: Color = Color::Rgb(80, 85, 100);
    pub const TEXT_CONTENT: Color = Color::Rgb(170, 175, 190);

    // ── Key style (for footer hints) ─────────────────────────────────
    pub const TEXT_KEY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_KEY_DESC: Color = Color::DarkGray;

    // ── Accent ───────────────────────────────────────────────────────
    pub const ACCENT_BLUE: Color = Color::Rgb(100, 180, 240);
    pub const ACCENT_YELLOW: Color = Color::Rgb(220, 180, 60);

    // ── Role colors ──────────────────────────────────────────────────
    pub const ROLE_USER: Color = Color::Rgb(80, 180, 100);
    pub const ROLE_AGENT: Color = Color::Rgb(100, 140, 220);

    // ── Evidence tree ────────────────────────────────────────────────
    pub const TREE: Color = Color::Rgb(70, 75, 90);
    pub const JSON_KEY: Color = Color::Rgb(180, 140, 220);
    pub const JSON_STRING: Color = Color::Rgb(80, 200, 120);
    pub const JSON_NUMBER: Color = Color::Rgb(217, 119, 80);
    pub const JSON_BOOL: Color = Color::Rgb(80, 200, 200);
    pub const JSON_NULL: Color = Color::Rgb(120, 125, 140);

    // ── Block helpers ────────────────────────────────────────────────

    pub fn block() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_NORMAL))
    }
}

pub fn role_color(role: Role) -> Color {
    match role {
        Role::User => Theme::ROLE_USER,
        Role::Assistant => Theme::ROLE_AGENT,
    }
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    }
}

pub fn tree_value_color(kind: RowKind) -> Color {
    match kind {
        RowKind::Open | RowKind::Close | RowKind::Collapsed => Theme::TREE,
        RowKind::String => Theme::JSON_STRING,
        RowKind::Number => Theme::JSON_NUMBER,
        RowKind::Bool => Theme::JSON_BOOL,
        RowKind::Null => Theme::JSON_NULL,
    }
}
