//! Plain-text renderings of tickets.

use chrono::SecondsFormat;

use super::{Ticket, Vocabulary};

/// Placeholder for an absent value.
pub const EMPTY_FIELD: &str = "—";

/// One-line summary: `#<id> — <subject> [<Status>] (priority: <Priority>)`.
pub fn ticket_line(ticket: &Ticket) -> String {
    format!(
        "#{} — {} [{}] (priority: {})",
        ticket.id,
        ticket.subject,
        ticket.status.label(),
        ticket.priority.label()
    )
}

/// One line per ticket, in the given order.
pub fn ticket_list(tickets: &[Ticket]) -> String {
    tickets
        .iter()
        .map(ticket_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line detail view.
pub fn ticket_summary(ticket: &Ticket) -> String {
    format!(
        "📄 Ticket #{}\nSubject: {}\nStatus: {}\nPriority: {}\nAssigned to: {}\nCreated: {}",
        ticket.id,
        ticket.subject,
        ticket.status.label(),
        ticket.priority.label(),
        ticket.assigned_to.as_deref().unwrap_or(EMPTY_FIELD),
        ticket
            .created_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
