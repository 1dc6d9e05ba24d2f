//! Core ticket data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::normalize::{normalize, UnknownValue, Vocabulary};

/// Urgency of a ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Vocabulary for Priority {
    const KIND: &'static str = "PriorityLevel";
    const MEMBERS: &'static [Self] = &[
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    fn name(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

/// Where a ticket is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Value `closed_at` must take once a ticket is in this status.
    ///
    /// Entering `Closed` keeps an existing stamp or takes `now`; any other
    /// status clears it.
    pub fn closed_at(
        self,
        previous: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match self {
            TicketStatus::Closed => Some(previous.unwrap_or(now)),
            _ => None,
        }
    }
}

impl Vocabulary for TicketStatus {
    const KIND: &'static str = "TicketStatus";
    const MEMBERS: &'static [Self] = &[
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    fn name(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    fn label(self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }
}

macro_rules! vocabulary_traits {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                normalize(s)
            }
        }
    };
}

vocabulary_traits!(Priority);
vocabulary_traits!(TicketStatus);

/// Ticket field that an update can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketField {
    Status,
    Priority,
    AssignedTo,
}

impl TicketField {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketField::Status => "status",
            TicketField::Priority => "priority",
            TicketField::AssignedTo => "assigned_to",
        }
    }
}

/// Field changes that have already been validated and normalized.
///
/// `assigned_to` is doubly optional: `None` leaves the assignee alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketChanges {
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<Option<String>>,
}

impl TicketChanges {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.assigned_to.is_none()
    }
}

/// A support ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier (UUID).
    pub id: String,
    /// Who raised the ticket.
    pub user: String,
    pub subject: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub assigned_to: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set while the ticket is closed.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Apply `changes` in place and return the touched fields, in the order
    /// status, priority, assigned_to.
    ///
    /// `updated_at` never moves behind `created_at`, even if the clock does.
    pub fn apply(&mut self, changes: &TicketChanges, now: DateTime<Utc>) -> Vec<TicketField> {
        let mut changed = Vec::new();

        if let Some(status) = changes.status {
            self.status = status;
            self.closed_at = status.closed_at(self.closed_at, now);
            changed.push(TicketField::Status);
        }

        if let Some(priority) = changes.priority {
            self.priority = priority;
            changed.push(TicketField::Priority);
        }

        if let Some(assigned_to) = &changes.assigned_to {
            self.assigned_to = assigned_to.clone();
            changed.push(TicketField::AssignedTo);
        }

        if !changed.is_empty() {
            self.updated_at = now.max(self.created_at);
        }

        changed
    }

    pub fn is_closed(&self) -> bool {
        self.status == TicketStatus::Closed
    }
}
