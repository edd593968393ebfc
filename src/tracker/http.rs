use crate::{
    config::Config,
    domain::TicketKey,
    error::{PlannerError, Result},
    tracker::{BoardPage, IssueRecord, SearchPage, SprintPage, Tracker},
};
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Tracker client speaking HTTP with basic auth
pub struct HttpTracker {
    client: Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl HttpTracker {
    const AGILE_API: &'static str = "/rest/agile/1.0";
    const PLATFORM_API: &'static str = "/rest/api/3";
    const USER_AGENT: &'static str = concat!("poker-planner/", env!("CARGO_PKG_VERSION"));

    /// Creates a client for the configured tracker
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().user_agent(Self::USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn sprints_path(board_id: u64) -> String {
        format!("{}/board/{}/sprint", Self::AGILE_API, board_id)
    }

    fn boards_path() -> String {
        format!("{}/board", Self::AGILE_API)
    }

    fn issue_path(key: &TicketKey) -> String {
        format!("{}/issue/{}", Self::PLATFORM_API, key)
    }

    fn search_path() -> String {
        format!("{}/search", Self::PLATFORM_API)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "GET");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::Api {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Tracker for HttpTracker {
    async fn sprint_page(
        &self,
        board_id: u64,
        start_at: usize,
        max_results: usize,
    ) -> Result<SprintPage> {
        let query = [
            ("startAt", start_at.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        self.get_json(&Self::sprints_path(board_id), &query).await
    }

    async fn boards(&self) -> Result<BoardPage> {
        self.get_json(&Self::boards_path(), &[]).await
    }

    async fn issue(&self, key: &TicketKey) -> Result<IssueRecord> {
        self.get_json(&Self::issue_path(key), &[]).await
    }

    async fn search_issues(
        &self,
        jql: &str,
        fields: &[&str],
        max_results: usize,
    ) -> Result<SearchPage> {
        let query = [
            ("jql", jql.to_string()),
            ("fields", fields.join(",")),
            ("maxResults", max_results.to_string()),
        ];
        self.get_json(&Self::search_path(), &query).await
    }
}
