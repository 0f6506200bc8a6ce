//! Application-wide error types.
//!
//! Everything the indexer does funnels into [`IndexerError`]: pool and
//! query failures from sqlx, RPC transport failures from reqwest, and
//! the escrow-specific [`IndexerError::EventDecode`] raised when a
//! `getEvents` payload cannot be mapped onto one of the contract's five
//! event shapes. Decode errors are terminal for the offending poll
//! iteration only; the poll loop logs them and keeps scanning.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    /// SQLite pool or query failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failure applying the embedded migrations at startup.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Transport-level RPC failure (after retries are exhausted).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON body from the RPC.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or unparseable environment configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A `getEvents` response that cannot be decoded into escrow events,
    /// or a hard RPC error that retrying will not fix.
    #[error("Event decode error: {0}")]
    EventDecode(String),
}

pub type Result<T> = std::result::Result<T, IndexerError>;
