//! Coach tools: the whole team's log and the season reset.
//!
//! The PIN gate here only hides tools from casual use. It is checked on the
//! athlete's own machine and can be bypassed by anyone who edits the flag
//! file or the config, so it must never be treated as access control. The
//! log sheet is what actually validates the PIN sent with a reset.

use crate::config::Config;
use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::progress::format_timestamp;
use crate::types::{LogEntry, ResetRequest};
use crate::ui::StatusMessage;
use chrono::{Local, TimeZone};
use log::{error, info, warn};
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

pub const RESET_CONFIRMATION: &str = "RESET SEASON";
pub const COACH_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const ENTER_PIN: &str = "Enter the coach PIN.";
pub const WRONG_PIN: &str = "That PIN did not match.";
pub const UNLOCKED: &str = "Coach tools unlocked.";
pub const LOCKED: &str = "Coach tools locked.";
pub const UNLOCK_FIRST: &str = "Unlock coach tools first.";
pub const LOAD_ERROR: &str = "Error loading logs.";
pub const SERVER_ERROR: &str = "Server error.";
pub const RESET_CANCELLED: &str = "Reset cancelled.";
pub const RESET_SENT: &str = "Reset request sent. Reload the logs to check it took effect.";
pub const RESET_FAILED: &str = "Could not send the reset request.";

/// Local marker remembering that the coach tools were unlocked.
#[derive(Debug, Clone)]
pub struct UnlockFlag {
    path: PathBuf,
}

impl UnlockFlag {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn is_set(&self) -> bool {
        self.path.exists()
    }

    pub fn set(&self) -> Result<(), ClientError> {
        fs::write(&self.path, b"unlocked\n")?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
            Ok(()) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoachView {
    pub status: StatusMessage,
    /// Hidden while `None`.
    pub entries: Option<Vec<String>>,
}

pub struct CoachPanel<'a, E> {
    endpoint: &'a E,
    coach_pin: Option<String>,
    flag: UnlockFlag,
    unlocked: bool,
}

impl<'a, E: Endpoint> CoachPanel<'a, E> {
    pub fn new(endpoint: &'a E, config: &Config) -> Self {
        let flag = UnlockFlag::new(&config.unlock_flag_path);
        Self {
            endpoint,
            coach_pin: config.coach_pin.clone(),
            unlocked: flag.is_set(),
            flag,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Without a configured PIN any non-empty PIN unlocks.
    pub fn unlock(&mut self, pin: &str) -> StatusMessage {
        if pin.is_empty() {
            return StatusMessage::error(ENTER_PIN);
        }
        if let Some(expected) = &self.coach_pin {
            if expected != pin {
                warn!("Coach unlock attempted with a non-matching PIN");
                return StatusMessage::error(WRONG_PIN);
            }
        }

        self.unlocked = true;
        if let Err(e) = self.flag.set() {
            warn!("Could not remember coach unlock: {}", e);
        }
        StatusMessage::success(UNLOCKED)
    }

    pub fn lock(&mut self) -> StatusMessage {
        self.unlocked = false;
        if let Err(e) = self.flag.clear() {
            warn!("Could not clear coach unlock flag: {}", e);
        }
        StatusMessage::neutral(LOCKED)
    }

    pub async fn load_all(&self) -> CoachView {
        self.load_all_in(&Local).await
    }

    pub async fn load_all_in<Tz>(&self, tz: &Tz) -> CoachView
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if !self.unlocked {
            return CoachView {
                status: StatusMessage::error(UNLOCK_FIRST),
                entries: None,
            };
        }

        match self.endpoint.fetch_logs(None).await {
            Ok(response) if response.is_success() && response.logs.is_none() => {
                error!("Team log reply reported success without any logs");
                CoachView {
                    status: StatusMessage::error(SERVER_ERROR),
                    entries: None,
                }
            }
            Ok(response) if response.is_success() => {
                let logs = response.into_logs();
                info!("Loaded {} team sessions", logs.len());
                CoachView {
                    status: StatusMessage::default(),
                    entries: Some(logs.iter().rev().map(|e| coach_line(e, tz)).collect()),
                }
            }
            Ok(response) => {
                error!(
                    "Team log request failed: {}",
                    response.message.as_deref().unwrap_or("no message")
                );
                CoachView {
                    status: StatusMessage::error(LOAD_ERROR),
                    entries: None,
                }
            }
            Err(e) => {
                error!("Team log request failed: {}", e);
                CoachView {
                    status: StatusMessage::error(SERVER_ERROR),
                    entries: None,
                }
            }
        }
    }

    /// Sends the destructive reset once `phrase` matches `RESET_CONFIRMATION`.
    /// The reply is never read, so success only means it was sent.
    pub async fn reset_season(&self, pin: &str, phrase: &str) -> StatusMessage {
        if !self.unlocked {
            return StatusMessage::error(UNLOCK_FIRST);
        }
        if pin.is_empty() {
            return StatusMessage::error(ENTER_PIN);
        }
        if phrase != RESET_CONFIRMATION {
            info!("Season reset not confirmed");
            return StatusMessage::neutral(RESET_CANCELLED);
        }

        match self.endpoint.reset_season(&ResetRequest::new(pin)).await {
            Ok(()) => StatusMessage::neutral(RESET_SENT),
            Err(e) => {
                error!("Season reset could not be sent: {}", e);
                StatusMessage::error(RESET_FAILED)
            }
        }
    }
}

pub fn coach_line<Tz>(entry: &LogEntry, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!(
        "{} — {} — {} — {} min — {}",
        format_timestamp(&entry.timestamp, COACH_DATE_FORMAT, tz),
        entry.name,
        entry.event,
        entry.minutes,
        entry.notes.as_deref().unwrap_or("")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{entry, Call, FakeEndpoint, Reply};
    use crate::types::EndpointResponse;
    use chrono::Utc;

    fn config(tag: &str, coach_pin: Option<&str>) -> Config {
        let path = std::env::temp_dir().join(format!(
            "practice-log-unlock-{}-{}",
            std::process::id(),
            tag
        ));
        let _ = fs::remove_file(&path);
        Config {
            coach_pin: coach_pin.map(str::to_string),
            unlock_flag_path: path,
            ..Config::default()
        }
    }

    fn team() -> Vec<LogEntry> {
        vec![
            entry("Alex", "Sprint", "20", None, "2024-01-01T08:00:00Z"),
            entry("Sam", "Relay", "35", Some("baton drills"), "2024-01-02T09:15:00Z"),
        ]
    }

    #[test]
    fn configured_pin_must_match() {
        let endpoint = FakeEndpoint::replying(EndpointResponse::success(Vec::new()));
        let config = config("match", Some("2468"));
        let mut panel = CoachPanel::new(&endpoint, &config);

        assert_eq!(panel.unlock(""), StatusMessage::error(ENTER_PIN));
        assert_eq!(panel.unlock("1111"), StatusMessage::error(WRONG_PIN));
        assert!(!panel.is_unlocked());

        assert_eq!(panel.unlock("2468"), StatusMessage::success(UNLOCKED));
        assert!(panel.is_unlocked());
        assert!(UnlockFlag::new(&config.unlock_flag_path).is_set());

        panel.lock();
        assert!(!panel.is_unlocked());
        assert!(!UnlockFlag::new(&config.unlock_flag_path).is_set());
    }

    #[test]
    fn unlock_is_remembered_between_panels() {
        let endpoint = FakeEndpoint::replying(EndpointResponse::success(Vec::new()));
        let config = config("remember", None);

        let mut first = CoachPanel::new(&endpoint, &config);
        first.unlock("anything");
        assert!(CoachPanel::new(&endpoint, &config).is_unlocked());

        first.lock();
        assert!(!CoachPanel::new(&endpoint, &config).is_unlocked());
    }

    #[tokio::test]
    async fn locked_panel_sends_nothing() {
        let endpoint = FakeEndpoint::replying(EndpointResponse::success(team()));
        let config = config("locked", None);
        let panel = CoachPanel::new(&endpoint, &config);

        assert_eq!(panel.load_all().await.status, StatusMessage::error(UNLOCK_FIRST));
        assert_eq!(
            panel.reset_season("1234", RESET_CONFIRMATION).await,
            StatusMessage::error(UNLOCK_FIRST)
        );
        assert!(endpoint.calls().is_empty());
    }

    #[tokio::test]
    async fn load_all_lists_newest_first() {
        let endpoint = FakeEndpoint::replying(EndpointResponse::success(team()));
        let config = config("load", None);
        let mut panel = CoachPanel::new(&endpoint, &config);
        panel.unlock("1234");

        let view = panel.load_all_in(&Utc).await;
        panel.lock();

        assert_eq!(endpoint.calls(), vec![Call::FetchLogs(None)]);
        assert_eq!(
            view.entries.unwrap(),
            vec![
                "2024-01-02 09:15 — Sam — Relay — 35 min — baton drills".to_string(),
                "2024-01-01 08:00 — Alex — Sprint — 20 min — ".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn load_all_distinguishes_server_and_transport_errors() {
        let config = config("errors", None);

        let refused = FakeEndpoint::replying(EndpointResponse {
            status: "error".into(),
            ..EndpointResponse::default()
        });
        let mut panel = CoachPanel::new(&refused, &config);
        panel.unlock("1234");
        assert_eq!(panel.load_all().await.status, StatusMessage::error(LOAD_ERROR));

        let down = FakeEndpoint::new(Reply::Unreachable);
        let panel = CoachPanel::new(&down, &config);
        let view = panel.load_all().await;
        assert_eq!(view.status, StatusMessage::error(SERVER_ERROR));
        assert_eq!(view.entries, None);

        UnlockFlag::new(&config.unlock_flag_path).clear().unwrap();
    }

    #[tokio::test]
    async fn success_without_logs_is_a_server_error() {
        let endpoint = FakeEndpoint::replying(EndpointResponse {
            status: "success".into(),
            ..EndpointResponse::default()
        });
        let config = config("no-logs", None);
        let mut panel = CoachPanel::new(&endpoint, &config);
        panel.unlock("1234");

        let view = panel.load_all().await;
        panel.lock();

        assert_eq!(view.status, StatusMessage::error(SERVER_ERROR));
        assert_eq!(view.entries, None);
    }

    #[tokio::test]
    async fn success_with_empty_logs_shows_empty_list() {
        let endpoint = FakeEndpoint::replying(EndpointResponse::success(Vec::new()));
        let config = config("empty-logs", None);
        let mut panel = CoachPanel::new(&endpoint, &config);
        panel.unlock("1234");

        let view = panel.load_all().await;
        panel.lock();

        assert!(view.status.is_empty());
        assert_eq!(view.entries, Some(Vec::new()));
    }

    #[test]
    fn unwritable_flag_reports_io_error() {
        let flag = UnlockFlag::new(std::env::temp_dir().join("practice-log-missing-dir").join("flag"));
        assert!(matches!(flag.set(), Err(ClientError::IoError(_))));
        assert!(flag.clear().is_ok());
    }

    #[tokio::test]
    async fn reset_requires_exact_phrase() {
        let endpoint = FakeEndpoint::replying(EndpointResponse::success(Vec::new()));
        let config = config("reset", None);
        let mut panel = CoachPanel::new(&endpoint, &config);
        panel.unlock("1234");

        assert_eq!(
            panel.reset_season("1234", "reset season").await,
            StatusMessage::neutral(RESET_CANCELLED)
        );
        assert!(endpoint.calls().is_empty());

        assert_eq!(
            panel.reset_season("1234", RESET_CONFIRMATION).await,
            StatusMessage::neutral(RESET_SENT)
        );
        assert_eq!(endpoint.calls(), vec![Call::Reset(ResetRequest::new("1234"))]);
        panel.lock();
    }

    #[tokio::test]
    async fn undeliverable_reset_is_reported() {
        let mut endpoint = FakeEndpoint::replying(EndpointResponse::success(Vec::new()));
        endpoint.one_way_reachable = false;
        let config = config("reset-down", None);
        let mut panel = CoachPanel::new(&endpoint, &config);
        panel.unlock("1234");

        assert_eq!(
            panel.reset_season("1234", RESET_CONFIRMATION).await,
            StatusMessage::error(RESET_FAILED)
        );
        panel.lock();
    }
}
