//! Scripted in-memory tracker for tests.

use crate::{
    domain::{Board, Sprint, TicketKey},
    error::{PlannerError, Result},
    tracker::{BoardPage, IssueRecord, SearchPage, SprintPage, Tracker},
};
use async_trait::async_trait;
use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

/// A request the fake received, for asserting on call patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    SprintPage {
        board_id: u64,
        start_at: usize,
        max_results: usize,
    },
    Boards,
    Issue(String),
    Search {
        jql: String,
        fields: Vec<String>,
        max_results: usize,
    },
}

/// Tracker returning canned responses; `None` entries fail the request
#[derive(Default)]
pub struct FakeTracker {
    sprint_pages: Mutex<VecDeque<Option<SprintPage>>>,
    boards: Option<Vec<Board>>,
    issues: HashMap<String, serde_json::Value>,
    search: Option<serde_json::Value>,
    requests: Mutex<Vec<Request>>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sprint_page(self, values: Vec<Sprint>, is_last: bool, total: Option<usize>) -> Self {
        self.push_sprint_page(Some(SprintPage {
            values,
            is_last,
            total,
        }))
    }

    pub fn with_failing_sprint_page(self) -> Self {
        self.push_sprint_page(None)
    }

    fn push_sprint_page(self, page: Option<SprintPage>) -> Self {
        if let Ok(mut pages) = self.sprint_pages.lock() {
            pages.push_back(page);
        }
        self
    }

    pub fn with_boards(mut self, boards: Vec<Board>) -> Self {
        self.boards = Some(boards);
        self
    }

    /// Registers a raw issue-detail response body
    pub fn with_issue(mut self, key: &str, body: serde_json::Value) -> Self {
        self.issues.insert(key.to_string(), body);
        self
    }

    /// Sets the raw search response body
    pub fn with_search(mut self, body: serde_json::Value) -> Self {
        self.search = Some(body);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn record(&self, request: Request) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }

    fn failure(what: &str) -> PlannerError {
        PlannerError::Api {
            status: 500,
            url: format!("fake://{}", what),
        }
    }
}

#[async_trait]
impl Tracker for FakeTracker {
    async fn sprint_page(
        &self,
        board_id: u64,
        start_at: usize,
        max_results: usize,
    ) -> Result<SprintPage> {
        self.record(Request::SprintPage {
            board_id,
            start_at,
            max_results,
        });
        let next = self
            .sprint_pages
            .lock()
            .ok()
            .and_then(|mut pages| pages.pop_front())
            .flatten();
        next.ok_or_else(|| Self::failure("sprints"))
    }

    async fn boards(&self) -> Result<BoardPage> {
        self.record(Request::Boards);
        self.boards
            .clone()
            .map(|values| BoardPage { values })
            .ok_or_else(|| Self::failure("boards"))
    }

    async fn issue(&self, key: &TicketKey) -> Result<IssueRecord> {
        self.record(Request::Issue(key.to_string()));
        let body = self
            .issues
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| PlannerError::Api {
                status: 404,
                url: format!("fake://issue/{}", key),
            })?;
        Ok(serde_json::from_value(body)?)
    }

    async fn search_issues(
        &self,
        jql: &str,
        fields: &[&str],
        max_results: usize,
    ) -> Result<SearchPage> {
        self.record(Request::Search {
            jql: jql.to_string(),
            fields: fields.iter().map(|field| field.to_string()).collect(),
            max_results,
        });
        let body = self.search.clone().ok_or_else(|| Self::failure("search"))?;
        Ok(serde_json::from_value(body)?)
    }
}
