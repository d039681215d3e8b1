pub mod app;
mod config;
pub mod export;
pub mod json_tree;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ragview_core::transcript::load_transcript;
use ragview_runtime_config::ViewerConfig;
use ratatui::prelude::*;
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

pub use config::{expand_policy, load_viewer_config, log_target, render_options, LogTarget};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub transcript: PathBuf,
    pub config: ViewerConfig,
    pub busy: bool,
}

/// Launch the interactive viewer.
pub fn run(options: RunOptions) -> Result<()> {
    let transcript = load_transcript(&options.transcript)
        .with_context(|| format!("Failed to load {}", options.transcript.display()))?;
    tracing::info!(
        path = %options.transcript.display(),
        messages = transcript.messages.len(),
        "transcript loaded"
    );

    let mut app = App::new(options.transcript, transcript, &options.config);
    app.busy_override = options.busy;

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code) {
                    return Ok(());
                }
            }
        } else {
            app.reload_if_changed();
        }
    }
}
