use crate::{
    config::Config,
    domain::{group_by_epic, select_next_sprint, Sprint, TicketKey},
    error::Result,
    format::render,
    repository::{IssueQuery, SprintRepository},
    tracker::{IssueRecord, Tracker},
};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tokio::fs;
use tracing::{error, info, warn};

/// File the rendered commands are saved to in ticket mode
pub const DEFAULT_OUTPUT_FILE: &str = "poker-planning.md";

/// How the sprint to plan is found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Use the sprint a ticket most recently joined
    Ticket(TicketKey),
    /// Pick the next sprint of a board
    Board(u64),
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    NoSprintFound,
    NoIssuesFound,
    Reported {
        sprint: Sprint,
        text: String,
        written_to: Option<PathBuf>,
    },
    Failed(String),
}

/// Runs one planning pass: sprint, tickets, groups, commands
pub struct Orchestrator<'a> {
    config: &'a Config,
    tracker: &'a dyn Tracker,
    output_path: PathBuf,
    console: Mutex<Box<dyn Write + Send + 'a>>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a Config, tracker: &'a dyn Tracker) -> Self {
        Self {
            config,
            tracker,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            console: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Sends the rendered commands somewhere other than stdout
    pub fn with_console(mut self, console: impl Write + Send + 'a) -> Self {
        self.console = Mutex::new(Box::new(console));
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Runs to completion; errors end the run as `Failed` instead of propagating
    pub async fn run(&self, mode: &RunMode) -> RunOutcome {
        match self.try_run(mode).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Run failed");
                RunOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_run(&self, mode: &RunMode) -> Result<RunOutcome> {
        let sprints = SprintRepository::new(self.tracker);

        let sprint = match mode {
            RunMode::Ticket(key) => {
                info!(ticket = %key, "Resolving sprint from ticket");
                let lookup = sprints.resolve_sprint_for_ticket(key).await;
                if lookup.sprint.is_none() {
                    self.diagnose_ticket(key, lookup.issue.as_ref()).await;
                }
                lookup.sprint
            }
            RunMode::Board(board_id) => {
                info!(board_id, "Resolving next sprint of board");
                let all = sprints.list_sprints(*board_id).await;
                select_next_sprint(&all).cloned()
            }
        };

        let Some(sprint) = sprint else {
            info!("No sprint found, nothing to plan");
            return Ok(RunOutcome::NoSprintFound);
        };
        info!(sprint = %sprint, "Planning sprint");

        let tickets = IssueQuery::new(self.tracker)
            .fetch_ready_to_size_issues(sprint.id)
            .await;
        if tickets.is_empty() {
            info!(sprint_id = sprint.id, "No tickets are ready to size");
            return Ok(RunOutcome::NoIssuesFound);
        }

        let groups = group_by_epic(&tickets);
        for group in &groups {
            info!(
                epic = %group.key,
                epic_name = %group.name,
                tickets = group.tickets.len(),
                "Epic group"
            );
        }

        let text = render(&groups, &self.config.base_url);
        self.emit(&text)?;

        let written_to = match mode {
            RunMode::Ticket(_) => {
                fs::write(&self.output_path, &text).await?;
                info!(path = %self.output_path.display(), "Saved poker planning commands");
                Some(self.output_path.clone())
            }
            RunMode::Board(_) => None,
        };

        Ok(RunOutcome::Reported {
            sprint,
            text,
            written_to,
        })
    }

    /// Writes the commands to the console; a closed pipe is an error, not a panic
    fn emit(&self, text: &str) -> Result<()> {
        let mut console = self.console.lock().unwrap_or_else(PoisonError::into_inner);
        console.write_all(text.as_bytes())?;
        console.flush()?;
        Ok(())
    }

    /// Logs what the tracker knows about a ticket whose sprint could not be found
    async fn diagnose_ticket(&self, key: &TicketKey, issue: Option<&IssueRecord>) {
        let repo = SprintRepository::new(self.tracker);

        if let Some(issue) = issue {
            info!(
                ticket = %key,
                status = issue.status_name().unwrap_or("unknown"),
                has_sprint_field = issue.has_sprint_field(),
                "Ticket inspection"
            );
        }

        let boards = repo.list_boards().await;
        if boards.is_empty() {
            warn!("No boards are visible with these credentials");
        }
        for board in &boards {
            info!(board = %board, "Available board");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Board, SprintState};
    use crate::tracker::fake::{FakeTracker, Request};
    use serde_json::{json, Value};
    use std::str::FromStr;
    use tempfile::TempDir;

    fn config() -> Config {
        Config {
            base_url: "https://x.atlassian.net".to_string(),
            email: "dev@example.com".to_string(),
            api_token: "secret".to_string(),
            board_id: 5,
        }
    }

    fn search_body() -> Value {
        json!({
            "issues": [
                {
                    "key": "T-1",
                    "fields": {
                        "summary": "Fix bug",
                        "parent": {"key": "EPIC-1", "fields": {"summary": "Login"}}
                    }
                },
                {"key": "T-2", "fields": {"summary": "Loose end"}}
            ]
        })
    }

    fn ticket_with_sprint(key: &str) -> Value {
        json!({
            "key": key,
            "fields": {
                "status": {"name": "Ready to Size"},
                "customfield_10020": [
                    {"id": 36, "name": "Sprint 9", "state": "closed"},
                    {"id": 37, "name": "Sprint 10", "state": "future"}
                ]
            }
        })
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    const EXPECTED: &str = "/pp https://x.atlassian.net/browse/T-2 Loose end\n\
                            \n\
                            /pp https://x.atlassian.net/browse/T-1 Fix bug\n\
                            \n";

    #[tokio::test]
    async fn test_board_mode_no_sprints() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join(DEFAULT_OUTPUT_FILE);
        let config = config();
        let tracker = FakeTracker::new().with_sprint_page(Vec::new(), true, Some(0));
        let orchestrator = Orchestrator::new(&config, &tracker).with_output_path(&output);

        let outcome = orchestrator.run(&RunMode::Board(5)).await;

        assert_eq!(outcome, RunOutcome::NoSprintFound);
        assert!(!output.exists());
        assert!(!tracker.requests().contains(&Request::Boards));
    }

    #[tokio::test]
    async fn test_board_mode_reports_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join(DEFAULT_OUTPUT_FILE);
        let config = config();
        let tracker = FakeTracker::new()
            .with_sprint_page(
                vec![
                    Sprint::new(40, "Sprint 10", SprintState::Future),
                    Sprint::new(41, "DevOps Sprint", SprintState::Future),
                    Sprint::new(39, "Sprint 9", SprintState::Active),
                ],
                true,
                None,
            )
            .with_search(search_body());
        let mut console = Vec::new();
        let orchestrator = Orchestrator::new(&config, &tracker)
            .with_output_path(&output)
            .with_console(&mut console);

        let outcome = orchestrator.run(&RunMode::Board(5)).await;
        drop(orchestrator);

        match outcome {
            RunOutcome::Reported {
                sprint,
                text,
                written_to,
            } => {
                assert_eq!(sprint.id, 40);
                assert_eq!(text, EXPECTED);
                assert!(written_to.is_none());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(String::from_utf8(console).unwrap(), EXPECTED);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_closed_console_fails_quietly() {
        let config = config();
        let tracker = FakeTracker::new()
            .with_sprint_page(
                vec![Sprint::new(40, "Sprint 10", SprintState::Future)],
                true,
                None,
            )
            .with_search(search_body());
        let orchestrator = Orchestrator::new(&config, &tracker).with_console(ClosedPipe);

        let outcome = orchestrator.run(&RunMode::Board(5)).await;

        assert!(matches!(outcome, RunOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_ticket_mode_writes_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join(DEFAULT_OUTPUT_FILE);
        std::fs::write(&output, "stale content from an earlier run\n".repeat(10)).unwrap();
        let config = config();
        let tracker = FakeTracker::new()
            .with_issue("PROJ-7", ticket_with_sprint("PROJ-7"))
            .with_search(search_body());
        let orchestrator = Orchestrator::new(&config, &tracker)
            .with_output_path(&output)
            .with_console(io::sink());
        let key = TicketKey::from_str("PROJ-7").unwrap();

        let outcome = orchestrator.run(&RunMode::Ticket(key)).await;

        match outcome {
            RunOutcome::Reported {
                sprint, written_to, ..
            } => {
                assert_eq!(sprint.name, "Sprint 10");
                assert_eq!(written_to.as_deref(), Some(output.as_path()));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(std::fs::read_to_string(&output).unwrap(), EXPECTED);

        let searched = tracker.requests().into_iter().any(|request| {
            matches!(request, Request::Search { jql, .. } if jql.starts_with("cf[10020] = 37 "))
        });
        assert!(searched);
    }

    #[tokio::test]
    async fn test_ticket_mode_without_sprint_runs_diagnostics() {
        let config = config();
        let tracker = FakeTracker::new()
            .with_issue(
                "PROJ-8",
                json!({"key": "PROJ-8", "fields": {"status": {"name": "Backlog"}}}),
            )
            .with_boards(vec![Board::new(5, "PROJ board")]);
        let orchestrator = Orchestrator::new(&config, &tracker);
        let key = TicketKey::from_str("PROJ-8").unwrap();

        let outcome = orchestrator.run(&RunMode::Ticket(key)).await;

        assert_eq!(outcome, RunOutcome::NoSprintFound);
        let requests = tracker.requests();
        assert_eq!(
            requests,
            vec![Request::Issue("PROJ-8".to_string()), Request::Boards]
        );
    }

    #[tokio::test]
    async fn test_no_issues_found() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join(DEFAULT_OUTPUT_FILE);
        let config = config();
        let tracker = FakeTracker::new()
            .with_issue("PROJ-7", ticket_with_sprint("PROJ-7"))
            .with_search(json!({"issues": []}));
        let orchestrator = Orchestrator::new(&config, &tracker).with_output_path(&output);
        let key = TicketKey::from_str("PROJ-7").unwrap();

        let outcome = orchestrator.run(&RunMode::Ticket(key)).await;

        assert_eq!(outcome, RunOutcome::NoIssuesFound);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_failed_search_ends_as_no_issues() {
        let config = config();
        let tracker = FakeTracker::new().with_sprint_page(
            vec![Sprint::new(39, "Sprint 9", SprintState::Active)],
            true,
            None,
        );
        let orchestrator = Orchestrator::new(&config, &tracker);

        let outcome = orchestrator.run(&RunMode::Board(5)).await;

        assert_eq!(outcome, RunOutcome::NoIssuesFound);
    }

    #[tokio::test]
    async fn test_unwritable_output_fails_quietly() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("missing-dir").join(DEFAULT_OUTPUT_FILE);
        let config = config();
        let tracker = FakeTracker::new()
            .with_issue("PROJ-7", ticket_with_sprint("PROJ-7"))
            .with_search(search_body());
        let orchestrator = Orchestrator::new(&config, &tracker)
            .with_output_path(&output)
            .with_console(io::sink());
        let key = TicketKey::from_str("PROJ-7").unwrap();

        let outcome = orchestrator.run(&RunMode::Ticket(key)).await;

        assert!(matches!(outcome, RunOutcome::Failed(_)));
    }

    #[test]
    fn test_default_output_path() {
        let config = config();
        let tracker = FakeTracker::new();
        let orchestrator = Orchestrator::new(&config, &tracker);
        assert_eq!(orchestrator.output_path(), Path::new(DEFAULT_OUTPUT_FILE));
    }
}
