use std::sync::Arc;

use helpdesk_core::{Authenticator, Config, SanitizedConfig, TicketTools};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    tools: TicketTools,
}

impl AppState {
    pub fn new(config: Config, authenticator: Arc<dyn Authenticator>, tools: TicketTools) -> Self {
        Self {
            config,
            authenticator,
            tools,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn tools(&self) -> &TicketTools {
        &self.tools
    }
}
