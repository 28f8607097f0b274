//! Error types for the booking engine
//!
//! This module defines the domain error types used throughout the application.

use thiserror::Error;

/// Errors that can occur while talking to the intranet
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Classify a transport error, separating timeouts from other failures
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Errors raised while resolving the target slot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Schedule string is not `HH:MM-HH:MM`
    #[error("Invalid schedule '{0}', expected HH:MM-HH:MM")]
    InvalidFormat(String),

    /// Hour or minute out of range
    #[error("Invalid time '{0}'")]
    InvalidTime(String),

    /// Start time is not before end time
    #[error("Schedule '{0}' ends before it starts")]
    EmptyRange(String),

    /// Date is not `YYYY-MM-DD`
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Errors raised while retrieving credentials
#[derive(Error, Debug)]
pub enum CredentialError {
    /// A named secret is absent from the store
    #[error("Secret '{0}' not found")]
    Missing(String),

    /// A named secret exists but is empty
    #[error("Secret '{0}' is empty")]
    Empty(String),

    /// The secret store could not be read
    #[error("Failed to read secret '{name}': {source}")]
    Unreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Terminal failures of a booking run
#[derive(Error, Debug)]
pub enum BookingError {
    /// Target slot could not be resolved
    #[error("Invalid target slot: {0}")]
    Schedule(#[from] ScheduleError),

    /// Credentials could not be obtained
    #[error("Error retrieving credentials: {0}")]
    Credentials(#[from] CredentialError),

    /// Login was rejected or unrecognised
    #[error("Login failed for {alias}")]
    LoginFailed { alias: String },

    /// The booking page can never be fetched with this configuration
    #[error("Booking page unreachable: {0}")]
    Fetch(#[from] FetchError),

    /// Attempt budget spent without a reservation
    #[error("Could not book after {attempts} attempts")]
    Exhausted { attempts: u32 },
}
