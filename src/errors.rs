//! Unified error types for the budgeting engine.
//!
//! All validation happens before any write; once a write begins, the whole
//! group either commits or rolls back, so a `Database` error never leaves a
//! partially visible schedule behind.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or parsing failed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// The caller asked for an allocation schedule that cannot be built
    /// (zero amount, zero installments, out-of-range target month, ...)
    #[error("Invalid schedule request: {reason}")]
    InvalidScheduleRequest {
        /// Description of the rejected input
        reason: String,
    },

    /// No account exists with the given ID
    #[error("Account not found: {id}")]
    AccountNotFound {
        /// The missing account ID
        id: i32,
    },

    /// No cash movement exists with the given ID
    #[error("Cash movement not found: {id}")]
    MovementNotFound {
        /// The missing movement ID
        id: i32,
    },

    /// No budget allocation exists with the given ID
    #[error("Budget allocation not found: {id}")]
    AllocationNotFound {
        /// The missing allocation ID
        id: i32,
    },

    /// The ledger store could not durably commit an atomic group
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Reading a configuration or environment file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
