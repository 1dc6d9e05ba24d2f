//! Support tickets: types, input normalization, storage and rendering.

mod config;
pub mod format;
mod normalize;
mod sqlite_store;
mod store;
mod types;

pub use config::TicketConfig;
pub use normalize::{normalize, CoercionPolicy, UnknownValue, Vocabulary};
pub use sqlite_store::SqliteTicketStore;
pub use store::{CreateTicketRequest, TicketError, TicketStore, TicketUpdate, UpdatedTicket};
pub use types::{Priority, Ticket, TicketChanges, TicketField, TicketStatus};
