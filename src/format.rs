use crate::domain::{EpicGroups, Ticket};

/// Poker planning command for one ticket, without a line break
pub fn poker_command(ticket: &Ticket, base_url: &str) -> String {
    format!("/pp {} {}", ticket.browse_url(base_url), ticket.summary)
}

/// Renders every group as `/pp` lines, one blank line after each group
pub fn render(groups: &EpicGroups, base_url: &str) -> String {
    let mut out = String::new();
    for group in groups {
        for ticket in &group.tickets {
            out.push_str(&poker_command(ticket, base_url));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
