use serde::{Deserialize, Serialize};
use std::fmt;

/// Project a board belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardLocation {
    #[serde(default)]
    pub project_key: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A named collection of tickets and sprints in the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub board_type: Option<String>,
    #[serde(default)]
    pub location: Option<BoardLocation>,
}

impl Board {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            board_type: None,
            location: None,
        }
    }

    /// Gets the key of the project the board lives in, if reported
    pub fn project_key(&self) -> Option<&str> {
        self.location
            .as_ref()
            .and_then(|location| location.project_key.as_deref())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {}", self.name, self.id)?;
        if let Some(kind) = &self.board_type {
            write!(f, ", {}", kind)?;
        }
        if let Some(project) = self.project_key() {
            write!(f, ", project {}", project)?;
        }
        write!(f, ")")
    }
}
