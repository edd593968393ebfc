pub mod issues;
pub mod sprints;

pub use issues::IssueQuery;
pub use sprints::{SprintRepository, TicketLookup};
