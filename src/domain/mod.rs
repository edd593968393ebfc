pub mod board;
pub mod grouping;
pub mod selector;
pub mod sorting;
pub mod sprint;
pub mod ticket;

pub use board::{Board, BoardLocation};
pub use grouping::{group_by_epic, EpicGroup, EpicGroups, NO_EPIC_KEY, NO_EPIC_NAME};
pub use selector::select_next_sprint;
pub use sorting::sort_sprints_by_start_desc;
pub use sprint::{Sprint, SprintState};
pub use ticket::{EpicRef, Ticket, TicketKey};
