//! Ticket store configuration.

use serde::{Deserialize, Serialize};

use super::CoercionPolicy;

/// Configuration for ticket queries and input handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketConfig {
    /// Row limit used by list/search when the caller does not pass one.
    #[serde(default = "default_list_limit")]
    pub default_list_limit: i64,

    /// Upper bound for any list/search limit. Larger requests are clamped.
    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: i64,

    /// How create treats a priority it cannot recognize.
    /// `fallback` stores `medium`, `strict` rejects the ticket.
    #[serde(default)]
    pub create_priority: CoercionPolicy,
}

fn default_list_limit() -> i64 {
    50
}

fn default_max_list_limit() -> i64 {
    1000
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            default_list_limit: default_list_limit(),
            max_list_limit: default_max_list_limit(),
            create_priority: CoercionPolicy::default(),
        }
    }
}

impl TicketConfig {
    /// Effective row limit for a query, or `None` when it can match nothing.
    pub fn effective_limit(&self, requested: i64) -> Option<i64> {
        (requested > 0).then(|| requested.min(self.max_list_limit))
    }
}
