use crate::endpoint::Endpoint;
use crate::types::LogEntry;
use crate::ui::StatusMessage;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::{error, info};
use std::fmt;

pub const CHART_WINDOW: usize = 7;
pub const HISTORY_DATE_FORMAT: &str = "%b %-d, %I:%M %p";

pub const SELECT_NAME: &str = "Please select your name.";
pub const NO_SESSIONS: &str = "No practice sessions logged yet.";
pub const LOAD_FAILED: &str = "Could not load progress. Please tell your coach.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total_minutes: f64,
    pub session_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBar {
    pub minutes: f64,
    pub height_percent: f64,
}

/// What the progress pane shows. `None` regions are hidden.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressView {
    pub status: StatusMessage,
    pub summary: Option<Summary>,
    pub chart: Option<Vec<ChartBar>>,
    pub history: Option<Vec<String>>,
}

impl ProgressView {
    fn message_only(status: StatusMessage) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn from_logs<Tz>(entries: &[LogEntry], tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if entries.is_empty() {
            return Self::message_only(StatusMessage::neutral(NO_SESSIONS));
        }

        Self {
            status: StatusMessage::default(),
            summary: Some(summarize(entries)),
            chart: Some(chart_bars(entries)),
            history: Some(
                entries
                    .iter()
                    .rev()
                    .map(|entry| history_line(entry, tz))
                    .collect(),
            ),
        }
    }

    pub fn is_showing_results(&self) -> bool {
        self.summary.is_some() || self.chart.is_some() || self.history.is_some()
    }
}

pub fn summarize(entries: &[LogEntry]) -> Summary {
    Summary {
        total_minutes: entries.iter().map(|e| e.minutes.value()).sum(),
        session_count: entries.len(),
    }
}

/// One bar per entry in the last `CHART_WINDOW`, oldest first, scaled to
/// the longest session in that window.
pub fn chart_bars(entries: &[LogEntry]) -> Vec<ChartBar> {
    let recent = &entries[entries.len().saturating_sub(CHART_WINDOW)..];
    let max_minutes = recent
        .iter()
        .map(|e| e.minutes.value())
        .fold(1.0, f64::max);

    recent
        .iter()
        .map(|e| {
            let minutes = e.minutes.value();
            ChartBar {
                minutes,
                height_percent: (minutes / max_minutes * 100.0).clamp(0.0, 100.0),
            }
        })
        .collect()
}

pub fn history_line<Tz>(entry: &LogEntry, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let date = format_timestamp(&entry.timestamp, HISTORY_DATE_FORMAT, tz);
    let mut line = format!("{} — {} — {} min", date, entry.event, entry.minutes);
    if let Some(notes) = &entry.notes {
        line.push_str(" — ");
        line.push_str(notes);
    }
    line
}

/// Formats a sheet timestamp, or returns an empty string when it cannot be
/// read as a date.
pub fn format_timestamp<Tz>(raw: &str, pattern: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    parse_timestamp(raw)
        .map(|dt| dt.with_timezone(tz).format(pattern).to_string())
        .unwrap_or_default()
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // Zone-less date-times are local, bare dates are UTC midnight.
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub struct ProgressViewer<'a, E> {
    endpoint: &'a E,
}

impl<'a, E: Endpoint> ProgressViewer<'a, E> {
    pub fn new(endpoint: &'a E) -> Self {
        Self { endpoint }
    }

    pub async fn load(&self, name: &str) -> ProgressView {
        self.load_in(name, &Local).await
    }

    pub async fn load_in<Tz>(&self, name: &str, tz: &Tz) -> ProgressView
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if name.is_empty() {
            return ProgressView::message_only(StatusMessage::error(SELECT_NAME));
        }

        info!("Loading progress for {}", name);
        match self.endpoint.fetch_logs(Some(name)).await {
            Ok(response) if response.is_success() => {
                let logs = response.into_logs();
                info!("Loaded {} sessions for {}", logs.len(), name);
                ProgressView::from_logs(&logs, tz)
            }
            Ok(response) => {
                error!(
                    "Progress request for {} failed: {}",
                    name,
                    response.message.as_deref().unwrap_or("unknown error from server")
                );
                ProgressView::message_only(StatusMessage::error(LOAD_FAILED))
            }
            Err(e) => {
                error!("Progress request for {} failed: {}", name, e);
                ProgressView::message_only(StatusMessage::error(LOAD_FAILED))
            }
        }
    }
}
