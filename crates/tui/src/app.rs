use crate::config::{expand_policy, render_options};
use crate::json_tree::ExpandPolicy;
use crossterm::event::KeyCode;
use ragview_core::conversation::{render, RenderOptions, RenderTree};
use ragview_core::evidence::PanelKind;
use ragview_core::transcript::{load_transcript, Transcript};
use ragview_runtime_config::ViewerConfig;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::SystemTime;

/// Identifies one evidence panel across redraws.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PanelKey {
    pub message_id: String,
    pub kind: PanelKind,
}

pub struct App {
    pub source: PathBuf,
    pub transcript: Transcript,
    /// Busy flag toggled from the keyboard; OR-ed with the transcript's own flag
    pub busy_override: bool,
    pub render_options: RenderOptions,
    pub expand: ExpandPolicy,
    pub scroll: u16,
    pub viewport_height: u16,
    pub selected_panel: Option<usize>,
    pub open_panels: HashSet<PanelKey>,
    pub last_modified: Option<SystemTime>,
    pub status: Option<String>,
}

impl App {
    pub fn new(source: PathBuf, transcript: Transcript, config: &ViewerConfig) -> Self {
        let last_modified = modified_time(&source);
        Self {
            source,
            transcript,
            busy_override: false,
            render_options: render_options(config),
            expand: expand_policy(config),
            scroll: 0,
            viewport_height: 0,
            selected_panel: None,
            open_panels: HashSet::new(),
            last_modified,
            status: None,
        }
    }

    pub fn busy(&self) -> bool {
        self.transcript.busy || self.busy_override
    }

    /// Fresh view tree with the open/closed state of each panel applied.
    pub fn render_tree(&self) -> RenderTree {
        let mut tree = render(
            &self.transcript.messages,
            self.busy(),
            &self.render_options,
        );
        for entry in &mut tree.entries {
            for panel in &mut entry.panels {
                let key = PanelKey {
                    message_id: entry.id.clone(),
                    kind: panel.kind,
                };
                panel.collapsed = !self.open_panels.contains(&key);
            }
        }
        tree
    }

    pub fn panel_keys(tree: &RenderTree) -> Vec<PanelKey> {
        tree.entries
            .iter()
            .flat_map(|entry| {
                entry.panels.iter().map(|panel| PanelKey {
                    message_id: entry.id.clone(),
                    kind: panel.kind,
                })
            })
            .collect()
    }

    pub fn selected_panel_key(&self, tree: &RenderTree) -> Option<PanelKey> {
        let index = self.selected_panel?;
        Self::panel_keys(tree).into_iter().nth(index)
    }

    /// Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        self.status = None;
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(self.viewport_height.max(1))
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(self.viewport_height.max(1))
            }
            KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
            KeyCode::Char('G') | KeyCode::End => self.scroll = u16::MAX,
            KeyCode::Tab => self.select_panel(1),
            KeyCode::BackTab => self.select_panel(-1),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected_panel(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.expand = self.expand.deeper(),
            KeyCode::Char('-') => self.expand = self.expand.shallower(),
            KeyCode::Char('i') => {
                let indexes = &mut self.render_options.show_array_indexes;
                *indexes = !*indexes;
                self.status = Some(format!(
                    "array indexes {}",
                    if *indexes { "on" } else { "off" }
                ));
            }
            KeyCode::Char('b') => self.busy_override = !self.busy_override,
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    fn select_panel(&mut self, step: isize) {
        let count = Self::panel_keys(&self.render_tree()).len();
        if count == 0 {
            self.selected_panel = None;
            return;
        }
        let next = match self.selected_panel {
            None if step >= 0 => 0,
            None => count - 1,
            Some(current) => {
                let current = current.min(count - 1) as isize;
                (current + step).rem_euclid(count as isize) as usize
            }
        };
        self.selected_panel = Some(next);
    }

    fn toggle_selected_panel(&mut self) {
        let tree = self.render_tree();
        let Some(key) = self.selected_panel_key(&tree) else {
            return;
        };
        if !self.open_panels.remove(&key) {
            self.open_panels.insert(key);
        }
    }

    /// Re-read the transcript when the file changed on disk.
    pub fn reload_if_changed(&mut self) {
        let modified = modified_time(&self.source);
        if modified.is_some() && modified != self.last_modified {
            self.reload();
        }
    }

    fn reload(&mut self) {
        match load_transcript(&self.source) {
            Ok(transcript) => {
                tracing::debug!(
                    path = %self.source.display(),
                    messages = transcript.messages.len(),
                    "transcript reloaded"
                );
                self.transcript = transcript;
                self.last_modified = modified_time(&self.source);
                self.clamp_selection();
            }
            Err(error) => {
                // Keep showing the last good transcript.
                tracing::warn!(path = %self.source.display(), %error, "transcript reload failed");
                self.last_modified = modified_time(&self.source);
                self.status = Some(format!("reload failed: {error}"));
            }
        }
    }

    fn clamp_selection(&mut self) {
        let count = Self::panel_keys(&self.render_tree()).len();
        self.selected_panel = match self.selected_panel {
            Some(_) if count == 0 => None,
            Some(index) => Some(index.min(count - 1)),
            None => None,
        };
    }
}

fn modified_time(path: &std::path::Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragview_core::testing;
    use serde_json::json;

    fn make_app() -> App {
        let transcript = Transcript {
            messages: vec![
                testing::user("what does section 2 say?"),
                testing::assistant_with("a1", Some(&[&["s2 text"]]), Some(&[0]), None),
                testing::assistant_with("a2", None, None, Some(json!({ "ids": [["c1"]] }))),
            ],
            busy: false,
        };
        App::new(
            PathBuf::from("/nonexistent/transcript.json"),
            transcript,
            &ViewerConfig::default(),
        )
    }

    #[test]
    fn panels_start_collapsed() {
        let app = make_app();
        let tree = app.render_tree();
        assert_eq!(tree.panel_count(), 3);
        assert!(tree.entries.iter().flat_map(|e| &e.panels).all(|p| p.collapsed));
    }

    #[test]
    fn tab_cycles_through_panels_and_wraps() {
        let mut app = make_app();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.selected_panel, Some(0));
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.selected_panel, Some(2));
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.selected_panel, Some(0));
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.selected_panel, Some(2));
    }

    #[test]
    fn enter_toggles_selected_panel() {
        let mut app = make_app();
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Enter);

        let tree = app.render_tree();
        let a1 = &tree.entries[1];
        assert!(a1.panels[0].collapsed);
        assert!(!a1.panels[1].collapsed);
        assert_eq!(a1.panels[1].kind, PanelKind::RankedIds);

        app.handle_key(KeyCode::Char(' '));
        assert!(app.render_tree().entries[1].panels[1].collapsed);
    }

    #[test]
    fn busy_toggle_adds_trailing_indicator() {
        let mut app = make_app();
        assert!(app.render_tree().busy_indicator.is_none());
        app.handle_key(KeyCode::Char('b'));
        assert!(app.render_tree().busy_indicator.is_some());
        app.handle_key(KeyCode::Char('b'));
        assert!(app.render_tree().busy_indicator.is_none());
    }

    #[test]
    fn index_toggle_switches_panel_bodies() {
        let mut app = make_app();
        let indexed = app.render_tree().entries[2].panels[0].body.clone();
        assert_eq!(indexed, json!({ "ids": { "0": { "0": "c1" } } }));

        app.handle_key(KeyCode::Char('i'));
        let raw = app.render_tree().entries[2].panels[0].body.clone();
        assert_eq!(raw, json!({ "ids": [["c1"]] }));
        assert_eq!(app.status.as_deref(), Some("array indexes off"));
    }

    #[test]
    fn expand_depth_keys_adjust_policy() {
        let mut app = make_app();
        assert_eq!(app.expand, ExpandPolicy::ROOT_ONLY);
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.expand.depth, 2);
        app.handle_key(KeyCode::Char('-'));
        app.handle_key(KeyCode::Char('-'));
        assert_eq!(app.expand.depth, 0);
    }

    #[test]
    fn quit_keys_return_true() {
        let mut app = make_app();
        assert!(!app.handle_key(KeyCode::Char('j')));
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
    }

    #[test]
    fn no_panels_means_no_selection() {
        let mut app = App::new(
            PathBuf::from("/nonexistent"),
            Transcript::default(),
            &ViewerConfig::default(),
        );
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.selected_panel, None);
        app.handle_key(KeyCode::Enter);
        assert!(app.open_panels.is_empty());
    }

    #[test]
    fn failed_reload_keeps_previous_transcript() {
        let mut app = make_app();
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.transcript.messages.len(), 3);
        assert!(app.status.as_deref().unwrap().starts_with("reload failed"));
    }

    #[test]
    fn reload_picks_up_appended_messages() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"id":"u1","role":"user","content":"q","createdAt":1}}"#
        )
        .unwrap();
        let transcript = load_transcript(file.path()).unwrap();
        let mut app = App::new(file.path().to_path_buf(), transcript, &ViewerConfig::default());

        writeln!(
            file,
            r#"{{"id":"a1","role":"assistant","content":"a","createdAt":2,"meta":{{"reranked_ids":[0]}}}}"#
        )
        .unwrap();
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.transcript.messages.len(), 2);
        assert_eq!(app.render_tree().panel_count(), 1);
    }
}
