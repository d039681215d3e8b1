use crate::json_tree::ExpandPolicy;
use anyhow::{Context, Result};
use ragview_core::conversation::RenderOptions;
use ragview_core::TimeLabelZone;
use ragview_runtime_config::{
    load_config, load_or_default, LoggingSettings, TimeZoneSetting, ViewerConfig,
    CONFIG_FILE_NAME,
};
use std::path::{Path, PathBuf};

pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("ragview"))
}

/// Load `--config PATH` strictly, or `~/.config/ragview/ragview.toml` leniently.
pub fn load_viewer_config(explicit: Option<&Path>) -> Result<ViewerConfig> {
    if let Some(path) = explicit {
        return load_config(path).with_context(|| format!("Failed to load {}", path.display()));
    }
    let Ok(dir) = config_dir() else {
        return Ok(ViewerConfig::default());
    };
    let path = dir.join(CONFIG_FILE_NAME);
    load_or_default(&path).with_context(|| format!("Failed to load {}", path.display()))
}

pub fn render_options(config: &ViewerConfig) -> RenderOptions {
    RenderOptions {
        show_array_indexes: config.display.show_array_indexes,
        time_zone: match config.display.time_zone {
            TimeZoneSetting::Local => TimeLabelZone::Local,
            TimeZoneSetting::Utc => TimeLabelZone::Utc,
        },
    }
}

pub fn expand_policy(config: &ViewerConfig) -> ExpandPolicy {
    ExpandPolicy {
        depth: config.display.expand_depth,
    }
}

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
    /// Interactive sessions own the terminal; stderr would draw over the screen.
    Discard,
}

pub fn log_target(settings: &LoggingSettings, interactive: bool) -> LogTarget {
    match &settings.file {
        Some(path) => LogTarget::File(path.clone()),
        None if interactive => LogTarget::Discard,
        None => LogTarget::Stderr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_config_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\nexpand_depth = 3").unwrap();
        let config = load_viewer_config(Some(file.path())).unwrap();
        assert_eq!(config.display.expand_depth, 3);
    }

    #[test]
    fn utc_setting_maps_to_utc_labels() {
        let mut config = ViewerConfig::default();
        config.display.time_zone = TimeZoneSetting::Utc;
        config.display.show_array_indexes = false;
        let options = render_options(&config);
        assert_eq!(options.time_zone, TimeLabelZone::Utc);
        assert!(!options.show_array_indexes);
        assert_eq!(expand_policy(&config), ExpandPolicy::ROOT_ONLY);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_viewer_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn interactive_mode_never_logs_to_stderr() {
        let settings = LoggingSettings::default();
        assert_eq!(log_target(&settings, true), LogTarget::Discard);
        assert_eq!(log_target(&settings, false), LogTarget::Stderr);
    }

    #[test]
    fn configured_log_file_wins_in_both_modes() {
        let settings = LoggingSettings {
            file: Some(PathBuf::from("/tmp/ragview.log")),
            ..LoggingSettings::default()
        };
        let expected = LogTarget::File(PathBuf::from("/tmp/ragview.log"));
        assert_eq!(log_target(&settings, true), expected);
        assert_eq!(log_target(&settings, false), expected);
    }
}
