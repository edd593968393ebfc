use crate::error::{PlannerError, Result};
use std::fmt;

pub const BASE_URL_VAR: &str = "JIRA_BASE_URL";
pub const EMAIL_VAR: &str = "JIRA_EMAIL";
pub const API_TOKEN_VAR: &str = "JIRA_API_TOKEN";
pub const BOARD_ID_VAR: &str = "JIRA_BOARD_ID";

/// Tracker settings, read once at startup
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Tracker root URL without a trailing slash
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    /// Board used when no ticket is given
    pub board_id: u64,
}

impl Config {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any name to value lookup
    ///
    /// Blank values count as missing. All missing names are reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut require = |name: &'static str| -> String {
            match lookup(name).map(|value| value.trim().to_string()) {
                Some(value) if !value.is_empty() => value,
                _ => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let base_url = require(BASE_URL_VAR);
        let email = require(EMAIL_VAR);
        let api_token = require(API_TOKEN_VAR);
        let board_id = require(BOARD_ID_VAR);

        if !missing.is_empty() {
            return Err(PlannerError::MissingConfig(missing));
        }

        let board_id = board_id
            .parse::<u64>()
            .map_err(|e| PlannerError::InvalidConfig {
                name: BOARD_ID_VAR,
                reason: format!("'{}' is not a board id ({})", board_id, e),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            email,
            api_token,
            board_id,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("board_id", &self.board_id)
            .finish()
    }
}
