//! Crate-wide error type and classification
//!
//! Domain errors live in [`crate::utils::error`]. They share
//! [`BookerErrorTrait`], which the booking loop uses to tell a lost attempt
//! from a lost run, and fold into [`Error`] at the server and CLI boundary.
//!
//! ```rust,ignore
//! use padel_booker::error::{BookerErrorTrait, FetchError};
//!
//! assert!(FetchError::Timeout.is_recoverable());
//! assert!(!FetchError::InvalidUrl("::".into()).is_recoverable());
//! ```

use std::io;
use thiserror::Error;

pub use crate::utils::error::{BookingError, CredentialError, FetchError, ScheduleError};

/// Common trait for all padel-booker error types
///
/// The booking loop branches on [`is_recoverable`](Self::is_recoverable):
/// recoverable errors are absorbed into the attempt budget, the rest end the run.
pub trait BookerErrorTrait: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout)
    Network,
    /// Markup and input parsing errors
    Parsing,
    /// Secret store errors
    Credentials,
    /// Login rejected
    Authentication,
    /// Booking loop outcome errors
    Booking,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Parsing => "parsing error",
            Self::Credentials => "credential error",
            Self::Authentication => "authentication error",
            Self::Booking => "booking error",
            Self::Config => "configuration error",
            Self::Other => "other error",
        }
    }
}

impl BookerErrorTrait for FetchError {
    fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidUrl(_))
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidUrl(_) => ErrorCategory::Parsing,
            _ => ErrorCategory::Network,
        }
    }
}

impl BookerErrorTrait for ScheduleError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Parsing
    }
}

impl BookerErrorTrait for CredentialError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Credentials
    }
}

impl BookerErrorTrait for BookingError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Schedule(e) => e.category(),
            Self::Credentials(e) => e.category(),
            Self::Fetch(e) => e.category(),
            Self::LoginFailed { .. } => ErrorCategory::Authentication,
            Self::Exhausted { .. } => ErrorCategory::Booking,
        }
    }
}

/// Unified error type for the padel-booker crate
#[derive(Error, Debug)]
pub enum Error {
    /// Intranet fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl BookerErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Io(e) => e.kind() == io::ErrorKind::Interrupted,
            Self::Config(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(e) => e.category(),
            Self::Io(_) => ErrorCategory::Other,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
