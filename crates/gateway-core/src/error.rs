//! Error types for gateway-core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A value the operation needs is not present in the gateway configuration.
    /// The payload is the configuration key, e.g. `ACCOUNT_SID`.
    #[error("Missing configuration value: {0}")]
    ConfigurationMissing(&'static str),

    #[error("Signing error: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token lifetime out of range: {0}s")]
    TokenLifetime(u64),

    #[error("Markup error: {0}")]
    Markup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
