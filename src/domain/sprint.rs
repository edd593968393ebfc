use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lifecycle state of a sprint as reported by the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum SprintState {
    Future,
    Active,
    Closed,
    /// Any tracker-defined state this crate has no special handling for
    Other(String),
}

impl Default for SprintState {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for SprintState {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "future" => Self::Future,
            "active" => Self::Active,
            "closed" => Self::Closed,
            _ => Self::Other(raw),
        }
    }
}

/// A null or missing state decodes as the unknown state
impl From<Option<String>> for SprintState {
    fn from(raw: Option<String>) -> Self {
        raw.map(Self::from).unwrap_or_default()
    }
}

impl From<&str> for SprintState {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<SprintState> for String {
    fn from(state: SprintState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for SprintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Future => write!(f, "future"),
            Self::Active => write!(f, "active"),
            Self::Closed => write!(f, "closed"),
            Self::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// A time-boxed work period on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: SprintState,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub complete_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

impl Sprint {
    /// Creates an undated sprint
    pub fn new(id: u64, name: impl Into<String>, state: SprintState) -> Self {
        Self {
            id,
            name: name.into(),
            state,
            start_date: None,
            end_date: None,
            complete_date: None,
            goal: None,
        }
    }

    pub fn with_start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn is_future(&self) -> bool {
        self.state == SprintState::Future
    }

    pub fn is_active(&self) -> bool {
        self.state == SprintState::Active
    }
}

impl fmt::Display for Sprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {}, {})", self.name, self.id, self.state)
    }
}

/// Parses a tracker timestamp, returning `None` for anything unreadable.
///
/// Accepts RFC 3339 as well as the `+0000` offset style some tracker
/// endpoints emit.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|value| value.as_str()).and_then(parse_date))
}
