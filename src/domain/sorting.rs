use crate::domain::sprint::Sprint;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Sorts sprints so the latest start date comes first
///
/// Sprints without a start date have nothing to compare against, so they keep
/// the position they were encountered at. Dated sprints are reordered among
/// the remaining positions, newest first, with ties kept in encountered order.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use poker_planner::domain::sorting::sort_sprints_by_start_desc;
/// use poker_planner::domain::sprint::{Sprint, SprintState};
///
/// let mut sprints = vec![
///     Sprint::new(1, "S1", SprintState::Closed)
///         .with_start_date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
///     Sprint::new(2, "S2", SprintState::Active)
///         .with_start_date(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
/// ];
///
/// sort_sprints_by_start_desc(&mut sprints);
/// assert_eq!(sprints[0].name, "S2");
/// ```
pub fn sort_sprints_by_start_desc(sprints: &mut [Sprint]) {
    let dated_slots: Vec<usize> = sprints
        .iter()
        .enumerate()
        .filter(|(_, sprint)| sprint.start_date.is_some())
        .map(|(index, _)| index)
        .collect();

    let mut dated: Vec<Sprint> = dated_slots.iter().map(|&i| sprints[i].clone()).collect();
    dated.sort_by(|a, b| compare_option_dates(a.start_date, b.start_date).reverse());

    for (slot, sprint) in dated_slots.into_iter().zip(dated) {
        sprints[slot] = sprint;
    }
}

/// Compare Option<DateTime>, treating a missing date as incomparable
///
/// Only `sort_sprints_by_start_desc` feeds this to a sort, and it never passes
/// `None`, so the `Equal` answer cannot break the total order `sort_by` needs.
pub fn compare_option_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a_date), Some(b_date)) => a_date.cmp(&b_date),
        _ => Ordering::Equal,
    }
}
