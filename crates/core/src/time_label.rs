use chrono::{DateTime, Local};

/// Clock used for message time labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeLabelZone {
    #[default]
    Local,
    Utc,
}

/// `HH:MM` label for an epoch-millisecond timestamp. A missing or
/// out-of-range timestamp yields an empty label.
pub fn format_time_label(created_at_ms: Option<i64>, zone: TimeLabelZone) -> String {
    let Some(created_at_ms) = created_at_ms else {
        return String::new();
    };
    let Some(utc) = DateTime::from_timestamp_millis(created_at_ms) else {
        tracing::debug!(created_at_ms, "timestamp out of range, leaving time label empty");
        return String::new();
    };
    match zone {
        TimeLabelZone::Utc => utc.format("%H:%M").to_string(),
        TimeLabelZone::Local => utc.with_timezone(&Local).format("%H:%M").to_string(),
    }
}
