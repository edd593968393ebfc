use crate::{
    domain::Ticket,
    tracker::{schema::SPRINT_FIELD_JQL, Tracker},
};
use tracing::{info, warn};

/// Status of tickets waiting for estimation
pub const READY_TO_SIZE_STATUS: &str = "Ready to Size";

/// Most tickets fetched per run; the search is not paged further
pub const MAX_ISSUES: usize = 100;

/// Fields requested for each ticket
pub const ISSUE_FIELDS: &[&str] = &["summary", "status", "parent"];

/// JQL selecting a sprint's ready-to-size tickets
pub fn ready_to_size_jql(sprint_id: u64) -> String {
    format!(
        "{} = {} AND status = \"{}\"",
        SPRINT_FIELD_JQL, sprint_id, READY_TO_SIZE_STATUS
    )
}

/// Ticket searches against the tracker
pub struct IssueQuery<'a> {
    tracker: &'a dyn Tracker,
}

impl<'a> IssueQuery<'a> {
    pub fn new(tracker: &'a dyn Tracker) -> Self {
        Self { tracker }
    }

    /// Fetches up to `MAX_ISSUES` ready-to-size tickets of a sprint
    ///
    /// A failed search is logged and yields no tickets.
    pub async fn fetch_ready_to_size_issues(&self, sprint_id: u64) -> Vec<Ticket> {
        let jql = ready_to_size_jql(sprint_id);
        match self
            .tracker
            .search_issues(&jql, ISSUE_FIELDS, MAX_ISSUES)
            .await
        {
            Ok(page) => {
                if let Some(total) = page.total.filter(|&total| total > MAX_ISSUES) {
                    warn!(sprint_id, total, kept = MAX_ISSUES, "More tickets match than are fetched");
                }
                let tickets = page.into_tickets();
                info!(sprint_id, count = tickets.len(), "Fetched ready-to-size tickets");
                tickets
            }
            Err(e) => {
                warn!(sprint_id, %jql, error = %e, "Failed to search tickets");
                Vec::new()
            }
        }
    }
}
