//! Shared error types for AgriFeed.
//!
//! Every failure in the dashboard degrades to a pre-written message; the
//! types here keep the technical detail for logs and expose a
//! `user_message()` for anything that reaches the viewer.

use thiserror::Error;

/// Top-level application error type.
///
/// Only the binary edge deals in `AppError`; the services below it turn
/// their own failures into degraded results instead of propagating them.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Recover a typed error from an `anyhow` chain where one is present.
    pub fn classify(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ConfigError>() {
            Ok(e) => return AppError::Config(e),
            Err(err) => err,
        };
        let err = match err.downcast::<NetworkError>() {
            Ok(e) => return AppError::Network(e),
            Err(err) => err,
        };
        match err.downcast::<std::io::Error>() {
            Ok(e) => AppError::Io(e),
            Err(err) => AppError::Other(err),
        }
    }

    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "Could not read or write the settings file.",
            AppError::Other(_) => "AgriFeed hit an unexpected problem. Please restart it.",
        }
    }
}

/// Network-related errors (HTTP, connectivity, payload shape).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Could not reach the weather or news service. Check your internet connection."
            }
            NetworkError::Timeout => "The service took too long to answer. Please try again later.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The service is having trouble right now. Please try again later."
            }
            NetworkError::ServerError { .. } => "The service rejected the request. Check your API keys.",
            NetworkError::InvalidResponse(_) => {
                "The service sent data we could not read. Please try again later."
            }
        }
    }

    /// True when the payload arrived but did not have the expected shape.
    pub fn is_malformed(&self) -> bool {
        matches!(self, NetworkError::InvalidResponse(_))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Some settings are invalid. Check config.toml.",
            ConfigError::ParseError(_) => "The settings file could not be read. Check config.toml for typos.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
