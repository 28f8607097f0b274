//! padel-booker - Automatic padel court reservation for the UPV intranet
//!
//! The intranet has no API: the booker logs in through the HTML form,
//! polls the booking page until a court is free at the wanted hour and
//! follows the reservation link before anyone else does.
//!
//! # Architecture
//!
//! - [`config`] - Configuration management and settings
//! - [`credentials`] - Credential providers (environment, secret files)
//! - [`parser`] - Booking link discovery in page markup
//! - [`session`] - Authenticated intranet session and success detection
//! - [`booking`] - The bounded scrape-and-submit loop
//! - [`server`] - HTTP trigger for scheduled runs
//! - [`models`] - Core data structures
//!
//! # Example
//!
//! ```no_run
//! use padel_booker::booking::{target_date_from_today, BookingOrchestrator};
//! use padel_booker::config::Config;
//! use padel_booker::credentials::provider_from_config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let credentials = provider_from_config(&config.credentials);
//!     let orchestrator = BookingOrchestrator::from_config(&config, credentials)?;
//!     let date = target_date_from_today(config.booking.day_offset);
//!     let result = orchestrator.run(date, &config.booking.schedule).await;
//!     println!("{}", serde_json::to_string(&result)?);
//!     Ok(())
//! }
//! ```

pub mod booking;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod parser;
pub mod server;
pub mod session;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::booking::{AttemptPolicy, BookingOrchestrator};
    pub use crate::config::Config;
    pub use crate::credentials::CredentialProvider;
    pub use crate::error::{BookerErrorTrait, Error, ErrorCategory, Result};
    pub use crate::models::{AttemptResult, BookingLink, Credentials, Schedule, TargetSlot};
    pub use crate::parser::SlotScanner;
    pub use crate::session::{BookingSession, IntranetSession};
}

pub use models::{AttemptResult, BookingLink, Credentials, TargetSlot};
