use super::{types::Config, AuthMethod, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - An API key is present when the api_key auth method is selected
/// - Ticket list limits are positive and consistent
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.auth.method == AuthMethod::ApiKey
        && config.auth.api_key.as_deref().map_or(true, str::is_empty)
    {
        return Err(ConfigError::ValidationError(
            "auth.api_key must be set when auth.method is \"api_key\"".to_string(),
        ));
    }

    let tickets = &config.tickets;
    if tickets.max_list_limit < 1 {
        return Err(ConfigError::ValidationError(
            "tickets.max_list_limit must be at least 1".to_string(),
        ));
    }
    if tickets.default_list_limit < 1 || tickets.default_list_limit > tickets.max_list_limit {
        return Err(ConfigError::ValidationError(format!(
            "tickets.default_list_limit must be between 1 and {}",
            tickets.max_list_limit
        )));
    }

    Ok(())
}
