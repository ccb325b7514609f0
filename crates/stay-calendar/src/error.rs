//! Error types for stay-calendar operations.
//!
//! The decision procedure itself is infallible: malformed payload entries are
//! dropped and invalid clicks are ignored. These errors only surface at parsing
//! boundaries and at the availability fetch port.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalendarError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Failure reported by an [`AvailabilityFetcher`](crate::coordinator::AvailabilityFetcher).
///
/// The coordinator only distinguishes success from failure; the variants exist so
/// callers can log something useful.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
