//! CLI error types.

use std::fmt;

use wayfinder::config::ConfigError;
use wayfinder::service::ServiceError;

/// Errors that can occur while running CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration error.
    Config(String),

    /// Failed to start the compass service.
    Service(ServiceError),

    /// Terminal or I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            CliError::Service(e) => {
                write!(f, "Failed to start compass service: {}", e)
            }
            CliError::Io(e) => {
                write!(f, "I/O error: {}", e)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Service(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
