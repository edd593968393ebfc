use crate::{
    domain::{sort_sprints_by_start_desc, Board, Sprint, TicketKey},
    tracker::{IssueRecord, Tracker},
};
use tracing::{debug, info, warn};

/// Sprints requested per page
pub const SPRINT_PAGE_SIZE: usize = 50;

/// Most sprints read from one board
pub const MAX_SPRINTS: usize = 1000;

/// What a ticket lookup found
#[derive(Debug, Clone, Default)]
pub struct TicketLookup {
    /// The ticket's record, absent when it could not be fetched
    pub issue: Option<IssueRecord>,
    /// The sprint the ticket most recently joined
    pub sprint: Option<Sprint>,
}

/// Sprint lookups against the tracker
///
/// Request failures are logged and reported as "no data"; nothing here
/// returns an error.
pub struct SprintRepository<'a> {
    tracker: &'a dyn Tracker,
}

impl<'a> SprintRepository<'a> {
    pub fn new(tracker: &'a dyn Tracker) -> Self {
        Self { tracker }
    }

    /// Lists a board's sprints, newest start date first
    ///
    /// Pages until the tracker reports the last page, the reported total is
    /// reached, or `MAX_SPRINTS` have been read. A failed page ends the
    /// listing with whatever was collected before it.
    pub async fn list_sprints(&self, board_id: u64) -> Vec<Sprint> {
        let mut sprints: Vec<Sprint> = Vec::new();
        let mut start_at = 0;

        loop {
            let page = match self
                .tracker
                .sprint_page(board_id, start_at, SPRINT_PAGE_SIZE)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        board_id,
                        start_at,
                        collected = sprints.len(),
                        error = %e,
                        "Failed to fetch sprints, keeping partial results"
                    );
                    break;
                }
            };

            let fetched = page.values.len();
            sprints.extend(page.values);
            start_at += fetched;
            debug!(board_id, fetched, collected = sprints.len(), "Fetched sprint page");

            let reached_total = page.total.map(|total| sprints.len() >= total).unwrap_or(false);
            if page.is_last || fetched == 0 || reached_total || sprints.len() >= MAX_SPRINTS {
                break;
            }
        }

        sprints.truncate(MAX_SPRINTS);
        sort_sprints_by_start_desc(&mut sprints);
        info!(board_id, count = sprints.len(), "Loaded sprints");
        sprints
    }

    /// Fetches a ticket's full record
    pub async fn fetch_ticket(&self, key: &TicketKey) -> Option<IssueRecord> {
        match self.tracker.issue(key).await {
            Ok(issue) => Some(issue),
            Err(e) => {
                warn!(ticket = %key, error = %e, "Failed to fetch ticket");
                None
            }
        }
    }

    /// Resolves the sprint a ticket most recently joined
    ///
    /// The fetched record is returned alongside so callers can inspect the
    /// ticket without asking the tracker again.
    pub async fn resolve_sprint_for_ticket(&self, key: &TicketKey) -> TicketLookup {
        let Some(issue) = self.fetch_ticket(key).await else {
            return TicketLookup::default();
        };
        let sprint = issue.latest_sprint();
        match &sprint {
            Some(sprint) => debug!(ticket = %key, sprint = %sprint, "Resolved sprint from ticket"),
            None => info!(ticket = %key, "Ticket has no readable sprint membership"),
        }
        TicketLookup {
            issue: Some(issue),
            sprint,
        }
    }

    /// Lists all boards visible to the account (single page)
    pub async fn list_boards(&self) -> Vec<Board> {
        match self.tracker.boards().await {
            Ok(page) => page.values,
            Err(e) => {
                warn!(error = %e, "Failed to list boards");
                Vec::new()
            }
        }
    }
}
