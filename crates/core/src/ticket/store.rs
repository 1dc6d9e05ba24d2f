//! Ticket storage trait and types.

use thiserror::Error;

use super::{Ticket, TicketField, UnknownValue};
use crate::db::{DbError, UnitOfWorkError};

/// Error type for ticket operations.
///
/// Only [`TicketError::Storage`] is a fault. Every other variant is an
/// ordinary outcome the caller reports back to the user.
#[derive(Debug, Error)]
pub enum TicketError {
    /// One or more required fields were absent or blank.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Search query was empty after trimming.
    #[error("Search query is empty")]
    EmptyQuery,

    /// Update supplied none of the updatable fields.
    #[error("Nothing to update")]
    NothingToUpdate,

    /// Ticket not found.
    #[error("Ticket not found: {0}")]
    NotFound(String),

    /// An enum-bearing field did not normalize.
    #[error(transparent)]
    InvalidValue(#[from] UnknownValue),

    /// Storage fault.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<rusqlite::Error> for TicketError {
    fn from(err: rusqlite::Error) -> Self {
        TicketError::Storage(DbError::Sqlite(err))
    }
}

impl UnitOfWorkError for TicketError {
    fn is_fault(&self) -> bool {
        matches!(self, TicketError::Storage(_))
    }
}

/// Request to create a new ticket.
///
/// `priority` is free text; the store normalizes it.
#[derive(Debug, Clone, Default)]
pub struct CreateTicketRequest {
    pub user: String,
    pub subject: String,
    pub description: String,
    pub priority: Option<String>,
    pub category: Option<String>,
}

impl CreateTicketRequest {
    pub fn new(
        user: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            subject: subject.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Requested changes to an existing ticket, as free text.
///
/// A blank `assigned_to` clears the assignee.
#[derive(Debug, Clone, Default)]
pub struct TicketUpdate {
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: Option<String>,
}

impl TicketUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

/// Result of a successful update.
#[derive(Debug, Clone)]
pub struct UpdatedTicket {
    pub ticket: Ticket,
    /// Fields that were written, in the order status, priority, assigned_to.
    pub changed: Vec<TicketField>,
}

/// Trait for ticket storage backends.
///
/// Every method is one unit of work.
pub trait TicketStore: Send + Sync {
    /// Create a new ticket.
    fn create(&self, request: CreateTicketRequest) -> Result<Ticket, TicketError>;

    /// Get a ticket by ID.
    fn get(&self, id: &str) -> Result<Option<Ticket>, TicketError>;

    /// Update the supplied fields of a ticket.
    fn update(&self, id: &str, update: TicketUpdate) -> Result<UpdatedTicket, TicketError>;

    /// Permanently delete a ticket.
    /// Returns the deleted ticket if found.
    fn delete(&self, id: &str) -> Result<Ticket, TicketError>;

    /// Tickets raised by `user`, newest first. A non-positive limit matches nothing.
    fn list_for_user(&self, user: &str, limit: i64) -> Result<Vec<Ticket>, TicketError>;

    /// Tickets whose subject or description contains `query`, ignoring
    /// case, newest first. A non-positive limit matches nothing.
    fn search(&self, query: &str, limit: i64) -> Result<Vec<Ticket>, TicketError>;

    /// Total number of stored tickets.
    fn count(&self) -> Result<i64, TicketError>;
}
