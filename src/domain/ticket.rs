use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Human-readable ticket key (e.g., PROJ-123)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketKey(String);

impl TicketKey {
    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TicketKey {
    type Err = crate::error::PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        let invalid = || crate::error::PlannerError::InvalidTicketKey(s.to_string());

        let (project, number) = normalized.split_once('-').ok_or_else(invalid)?;
        let project_ok = project
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic())
            .unwrap_or(false)
            && project.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        let number_ok = !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());

        if project_ok && number_ok {
            Ok(Self(normalized))
        } else {
            Err(invalid())
        }
    }
}

impl fmt::Display for TicketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parent epic of a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpicRef {
    pub key: String,
    pub summary: String,
}

impl EpicRef {
    pub fn new(key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            summary: summary.into(),
        }
    }
}

/// A tracker ticket as fetched for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub status: String,
    pub epic: Option<EpicRef>,
}

impl Ticket {
    /// Creates a ticket with no status and no epic
    pub fn new(key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            key: key.into(),
            summary: summary.into(),
            status: String::new(),
            epic: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_epic(mut self, epic: EpicRef) -> Self {
        self.epic = Some(epic);
        self
    }

    /// Link to the ticket in the tracker's web UI
    pub fn browse_url(&self, base_url: &str) -> String {
        format!("{}/browse/{}", base_url, self.key)
    }
}
