//! Unified error type for the crate.
//!
//! Validation failures abort the operation without touching state. Storage and
//! network failures are reported to the caller, who keeps working on local state.

use thiserror::Error;

/// All errors produced by the budgeting core and its adapters.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field is missing or malformed (empty name, bad date, bad code).
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// A monetary amount was negative or otherwise unusable.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// An event id did not match any event in the collection.
    #[error("Event not found: {id}")]
    EventNotFound {
        /// The id that was looked up
        id: String,
    },

    /// Persisted data could not be read back.
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable reason
        message: String,
    },

    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A remote call completed but did not succeed.
    #[error("Network error: {message}")]
    Network {
        /// Human-readable reason
        message: String,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for errors caused by bad user input rather than by I/O.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidAmount { .. })
    }

    /// True for errors raised by the sync or advisory transport.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Http(_))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_kinds() {
        assert!(Error::validation("name is required").is_validation());
        assert!(Error::InvalidAmount { amount: -1.0 }.is_validation());
        assert!(
            !Error::Storage {
                message: "corrupt".to_string()
            }
            .is_validation()
        );
    }

    #[test]
    fn test_network_kind() {
        let err = Error::Network {
            message: "status 500".to_string(),
        };
        assert!(err.is_network());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Network error: status 500");
    }
}
