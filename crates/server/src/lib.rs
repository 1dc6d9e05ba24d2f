//! HTTP front for the helpdesk ticket tools.

pub mod api;
pub mod metrics;
pub mod state;
