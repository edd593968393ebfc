use crate::{domain::TicketKey, error::Result};
use async_trait::async_trait;

pub mod http;
pub mod schema;

#[cfg(test)]
pub mod fake;

pub use http::HttpTracker;
pub use schema::{BoardPage, IssueRecord, SearchPage, SprintPage};

/// Read access to the ticket tracker's REST API
///
/// Every call is one request. Errors are returned as-is; deciding what a
/// failure means is left to the caller.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Fetches one page of a board's sprints
    async fn sprint_page(
        &self,
        board_id: u64,
        start_at: usize,
        max_results: usize,
    ) -> Result<SprintPage>;

    /// Lists the boards visible to the configured account
    async fn boards(&self) -> Result<BoardPage>;

    /// Fetches a single ticket with all of its fields
    async fn issue(&self, key: &TicketKey) -> Result<IssueRecord>;

    /// Runs a JQL search, returning at most `max_results` tickets
    async fn search_issues(
        &self,
        jql: &str,
        fields: &[&str],
        max_results: usize,
    ) -> Result<SearchPage>;
}
