use anyhow::{Context, Result};
use clap::Parser;
use ragview_core::transcript::load_transcript;
use ragview_runtime_config::{LoggingSettings, TimeZoneSetting, ViewerConfig};
use ragview_tui::export::{export_conversation, ExportOptions};
use ragview_tui::{
    expand_policy, load_viewer_config, log_target, render_options, LogTarget, RunOptions,
};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Parser)]
#[command(
    name = "ragview",
    about = "Browse question-answering transcripts with their retrieval evidence"
)]
struct Cli {
    /// Transcript file: JSON array, {"messages": [...]} document, or JSONL
    transcript: PathBuf,

    /// Config file (default: ~/.config/ragview/ragview.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show the trailing "Thinking…" row
    #[arg(long)]
    busy: bool,

    /// Hand arrays to the tree view without index keys
    #[arg(long)]
    no_array_indexes: bool,

    /// Format time labels in UTC
    #[arg(long)]
    utc: bool,

    /// Tree levels expanded when a panel opens
    #[arg(long)]
    expand_depth: Option<usize>,

    /// Print the rendered conversation instead of opening the viewer
    #[arg(long)]
    dump: bool,

    /// With --dump, print JSON
    #[arg(long, requires = "dump")]
    json: bool,

    /// With --dump, print evidence panel bodies
    #[arg(long, requires = "dump")]
    open_panels: bool,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_viewer_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    init_tracing(&config.logging, log_target(&config.logging, !cli.dump))?;

    if cli.dump {
        return dump(&cli, &config);
    }

    ragview_tui::run(RunOptions {
        transcript: cli.transcript,
        config,
        busy: cli.busy,
    })
}

fn apply_overrides(config: &mut ViewerConfig, cli: &Cli) {
    if cli.no_array_indexes {
        config.display.show_array_indexes = false;
    }
    if cli.utc {
        config.display.time_zone = TimeZoneSetting::Utc;
    }
    if let Some(depth) = cli.expand_depth {
        config.display.expand_depth = depth;
    }
    if let Some(path) = &cli.log_file {
        config.logging.file = Some(path.clone());
    }
}

fn init_tracing(settings: &LoggingSettings, target: LogTarget) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
        LogTarget::Discard => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn dump(cli: &Cli, config: &ViewerConfig) -> Result<()> {
    let transcript = load_transcript(&cli.transcript)
        .with_context(|| format!("Failed to load {}", cli.transcript.display()))?;

    let options = ExportOptions {
        render: render_options(config),
        expand: expand_policy(config),
        open_panels: cli.open_panels,
        busy: cli.busy,
    };
    let export = export_conversation(
        &cli.transcript.display().to_string(),
        &transcript,
        &options,
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&export)?);
    } else {
        for line in &export.lines {
            println!("{line}");
        }
    }
    Ok(())
}
