use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

pub const SUCCESS_STATUS: &str = "success";
pub const RESET_SEASON_ACTION: &str = "resetSeason";

/// A practice session as stored by the log sheet.
///
/// The sheet is loose about types (numbers come back as strings and the
/// other way round), so every field is read leniently and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub event: String,
    #[serde(default)]
    pub minutes: Minutes,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: String,
}

/// Minutes exactly as the sheet returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Minutes(String);

impl Minutes {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, `0` for anything empty or unparseable.
    pub fn value(&self) -> f64 {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            return 0.0;
        }
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Minutes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_text(deserializer).map(Minutes)
    }
}

/// Body of a practice submission. Minutes travel as typed by the athlete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticePayload {
    pub name: String,
    pub event: String,
    pub minutes: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetRequest {
    pub action: String,
    pub pin: String,
}

impl ResetRequest {
    pub fn new(pin: impl Into<String>) -> Self {
        Self {
            action: RESET_SEASON_ACTION.to_string(),
            pin: pin.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EndpointResponse {
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub message: Option<String>,
    #[serde(default)]
    pub logs: Option<Vec<LogEntry>>,
}

impl EndpointResponse {
    pub fn success(logs: Vec<LogEntry>) -> Self {
        Self {
            status: SUCCESS_STATUS.to_string(),
            message: None,
            logs: Some(logs),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    pub fn into_logs(self) -> Vec<LogEntry> {
        self.logs.unwrap_or_default()
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => match number.as_f64() {
            Some(n) => n.to_string(),
            None => number.to_string(),
        },
        Some(other) => other.to_string(),
    })
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_text(deserializer)?;
    Ok(if text.is_empty() { None } else { Some(text) })
}
