//! String-returning ticket tools for a conversational agent.
//!
//! Each tool takes primitive arguments and returns the exact text the agent
//! relays to the user. Validation problems, unknown values and missing
//! tickets are all rendered as text. Only storage faults come back as `Err`,
//! and the caller decides how to word those.

mod call;

pub use call::{ToolCall, ToolSpec, TOOL_SPECS};

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, error};

use crate::ticket::format::{ticket_list, ticket_summary};
use crate::ticket::{
    CreateTicketRequest, TicketError, TicketField, TicketStore, TicketUpdate, UpdatedTicket,
};

pub const MISSING_FIELDS: &str =
    "❌ Missing required fields: 'user', 'subject', and 'description' are required.";
pub const NOT_FOUND: &str = "❌ Ticket not found.";
pub const NOTHING_TO_UPDATE: &str =
    "⚠️ Nothing to update. Provide at least one updatable field (status, assigned_to, priority).";
pub const EMPTY_QUERY: &str = "❌ Please provide a search query.";
pub const NO_MATCHES: &str = "No tickets matched your query.";

/// Ticket tools bound to one store.
#[derive(Clone)]
pub struct TicketTools {
    store: Arc<dyn TicketStore>,
    default_limit: i64,
}

impl TicketTools {
    /// `default_limit` applies to list/search calls that omit a limit.
    pub fn new(store: Arc<dyn TicketStore>, default_limit: i64) -> Self {
        Self {
            store,
            default_limit,
        }
    }

    pub fn store(&self) -> &Arc<dyn TicketStore> {
        &self.store
    }

    /// Create a new support ticket.
    pub fn create_ticket(
        &self,
        user: &str,
        subject: &str,
        description: &str,
        priority: Option<&str>,
        category: Option<&str>,
    ) -> Result<String, TicketError> {
        let request = CreateTicketRequest {
            user: user.to_string(),
            subject: subject.to_string(),
            description: description.to_string(),
            priority: priority.map(str::to_string),
            category: category.map(str::to_string),
        };
        match self.store.create(request) {
            Ok(ticket) => Ok(format!("✅ Ticket created: #{} — {}", ticket.id, ticket.subject)),
            Err(err) => user_facing(err),
        }
    }

    /// Update status, assignee and/or priority of a ticket.
    pub fn update_ticket(
        &self,
        ticket_id: &str,
        status: Option<&str>,
        assigned_to: Option<&str>,
        priority: Option<&str>,
    ) -> Result<String, TicketError> {
        let update = TicketUpdate {
            status: status.map(str::to_string),
            assigned_to: assigned_to.map(str::to_string),
            priority: priority.map(str::to_string),
        };
        match self.store.update(ticket_id, update) {
            Ok(UpdatedTicket { ticket, changed }) => Ok(format!(
                "✅ Ticket #{} updated ({}).",
                ticket.id,
                changed
                    .iter()
                    .copied()
                    .map(TicketField::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            Err(err) => user_facing(err),
        }
    }

    /// Permanently delete a ticket.
    pub fn delete_ticket(&self, ticket_id: &str) -> Result<String, TicketError> {
        match self.store.delete(ticket_id) {
            Ok(_) => Ok(format!("🗑️ Ticket #{ticket_id} deleted.")),
            Err(err) => user_facing(err),
        }
    }

    /// Short multi-line summary of one ticket.
    pub fn check_ticket(&self, ticket_id: &str) -> Result<String, TicketError> {
        match self.store.get(ticket_id) {
            Ok(Some(ticket)) => Ok(ticket_summary(&ticket)),
            Ok(None) => Ok(NOT_FOUND.to_string()),
            Err(err) => user_facing(err),
        }
    }

    /// Tickets raised by `user`, newest first.
    pub fn list_tickets(&self, user: &str, limit: Option<i64>) -> Result<String, TicketError> {
        match self
            .store
            .list_for_user(user, limit.unwrap_or(self.default_limit))
        {
            Ok(tickets) if tickets.is_empty() => Ok(format!("No tickets found for user {user}.")),
            Ok(tickets) => Ok(ticket_list(&tickets)),
            Err(err) => user_facing(err),
        }
    }

    /// Tickets whose subject or description mentions `query`, newest first.
    pub fn search_tickets(&self, query: &str, limit: Option<i64>) -> Result<String, TicketError> {
        match self
            .store
            .search(query, limit.unwrap_or(self.default_limit))
        {
            Ok(tickets) if tickets.is_empty() => Ok(NO_MATCHES.to_string()),
            Ok(tickets) => Ok(ticket_list(&tickets)),
            Err(err) => user_facing(err),
        }
    }

    /// Current local date and time.
    pub fn get_current_datetime(&self) -> String {
        format_datetime(&Local::now())
    }

    /// Run a decoded tool call.
    pub fn dispatch(&self, call: &ToolCall) -> Result<String, TicketError> {
        debug!(tool = call.name(), "Dispatching tool call");
        match call {
            ToolCall::CreateTicket {
                user,
                subject,
                description,
                priority,
                category,
            } => self.create_ticket(
                user,
                subject,
                description,
                priority.as_deref(),
                category.as_deref(),
            ),
            ToolCall::UpdateTicket {
                ticket_id,
                status,
                assigned_to,
                priority,
            } => self.update_ticket(
                ticket_id,
                status.as_deref(),
                assigned_to.as_deref(),
                priority.as_deref(),
            ),
            ToolCall::DeleteTicket { ticket_id } => self.delete_ticket(ticket_id),
            ToolCall::CheckTicket { ticket_id } => self.check_ticket(ticket_id),
            ToolCall::ListTickets { user, limit } => self.list_tickets(user, *limit),
            ToolCall::SearchTickets { query, limit } => self.search_tickets(query, *limit),
            ToolCall::GetCurrentDatetime {} => Ok(self.get_current_datetime()),
        }
    }
}

/// `🕒 Sunday, 21 September 2025, 03:15 PM`
pub fn format_datetime<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("🕒 %A, %d %B %Y, %I:%M %p").to_string()
}

fn user_facing(err: TicketError) -> Result<String, TicketError> {
    match err {
        TicketError::MissingFields(_) => Ok(MISSING_FIELDS.to_string()),
        TicketError::EmptyQuery => Ok(EMPTY_QUERY.to_string()),
        TicketError::NothingToUpdate => Ok(NOTHING_TO_UPDATE.to_string()),
        TicketError::NotFound(_) => Ok(NOT_FOUND.to_string()),
        TicketError::InvalidValue(err) => Ok(format!("❌ {err}")),
        fault @ TicketError::Storage(_) => {
            error!(error = %fault, "Ticket storage fault");
            Err(fault)
        }
    }
}
