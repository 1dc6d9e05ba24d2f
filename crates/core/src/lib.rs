pub mod auth;
pub mod config;
pub mod db;
pub mod ticket;
pub mod tools;

pub use auth::{
    create_authenticator, ApiKeyAuthenticator, AuthError, Authenticator, Caller, Credentials,
    NoneAuthenticator,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, AuthMethod, Config,
    ConfigError, DatabaseConfig, SanitizedConfig, ServerConfig,
};
pub use db::{Database, DbError, UnitOfWorkError};
pub use ticket::{
    CoercionPolicy, CreateTicketRequest, Priority, SqliteTicketStore, Ticket, TicketConfig,
    TicketError, TicketStatus, TicketStore, TicketUpdate, UpdatedTicket,
};
pub use tools::{TicketTools, ToolCall, ToolSpec, TOOL_SPECS};
