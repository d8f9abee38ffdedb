//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// The calendar provider call failed or returned malformed data.
    #[error("Calendar provider error ({code}): {message}")]
    Provider { message: String, code: i64 },

    /// The persisted meeting store failed to answer a query.
    ///
    /// Raised by database-backed [`MeetingStore`](crate::source::MeetingStore)
    /// implementations; the in-memory store never fails.
    #[error("Meeting store error: {0}")]
    Store(String),

    #[error("Invalid timestamp: {0}")]
    Parse(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
