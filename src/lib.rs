//! # Poker Planner
//!
//! Finds the next sprint worth estimating on a tracker board, collects its
//! tickets waiting in "Ready to Size", groups them by parent epic and renders
//! one `/pp` poker planning command per ticket.
//!
//! Pure planning logic lives in [`domain`] and [`format`]; everything that
//! talks to the tracker goes through the [`tracker::Tracker`] trait.

pub mod config;
pub mod domain;
pub mod error;
pub mod format;
pub mod repository;
pub mod run;
pub mod tracker;

// Re-export commonly used types
pub use config::Config;
pub use domain::{
    board::Board,
    grouping::{group_by_epic, EpicGroup, EpicGroups},
    selector::select_next_sprint,
    sprint::{Sprint, SprintState},
    ticket::{EpicRef, Ticket, TicketKey},
};
pub use error::{PlannerError, Result};
pub use run::{Orchestrator, RunMode, RunOutcome};
pub use tracker::{HttpTracker, Tracker};
