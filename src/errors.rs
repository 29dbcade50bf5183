//! Unified error type for the ledger engine, configuration, and bot layer.
//!
//! Errors fall into three families that callers care about: validation failures
//! (rejected before any write), missing records, and store failures. Use
//! [`Error::kind`] to branch on the family without matching every variant.

use chrono::NaiveDate;
use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected before any mutation happened
    Validation,
    /// A referenced record does not exist
    NotFound,
    /// The underlying store failed; the surrounding transaction was rolled back
    Store,
    /// Configuration, environment, or framework failure outside the ledger
    Other,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("Date {date} cannot be in the future")]
    FutureDate { date: NaiveDate },

    #[error("Purchase {spending_id} has already been refunded")]
    AlreadyRefunded { spending_id: i64 },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`] on the given record type and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the family this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. }
            | Self::InvalidAmount { .. }
            | Self::FutureDate { .. }
            | Self::AlreadyRefunded { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Database(_) => ErrorKind::Store,
            Self::Config { .. } | Self::Io(_) | Self::EnvVar(_) | Self::Framework(_) => {
                ErrorKind::Other
            }
        }
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
