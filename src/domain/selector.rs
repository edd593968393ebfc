use crate::domain::sprint::Sprint;

/// Sprints whose name contains this are never picked as the next future sprint
pub const EXCLUDED_SPRINT_MARKER: &str = "DevOps";

/// Picks the sprint to plan from a board's sprints
///
/// Expects `sprints` sorted newest start date first. Preference order:
/// 1. the first `future` sprint not named for DevOps
/// 2. the first `active` sprint
/// 3. the first sprint of any state
///
/// Because the input is newest first, tier 1 yields the latest-starting
/// future sprint rather than the soonest one when several are scheduled.
pub fn select_next_sprint(sprints: &[Sprint]) -> Option<&Sprint> {
    sprints
        .iter()
        .find(|sprint| sprint.is_future() && !sprint.name.contains(EXCLUDED_SPRINT_MARKER))
        .or_else(|| sprints.iter().find(|sprint| sprint.is_active()))
        .or_else(|| sprints.first())
}
