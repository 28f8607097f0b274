//! Core data structures for a booking run

use std::fmt;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::error::ScheduleError;
use crate::utils::mask_identifier;

/// Date format used by the intranet and the CLI
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const TIME_FORMAT: &str = "%H:%M";

/// Intranet login credentials
///
/// Immutable for the run. `Debug` masks the identifier and never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Display name used in logs
    pub alias: String,
    /// Login identifier (national ID number)
    pub identifier: String,
    /// Login password
    pub secret: String,
}

impl Credentials {
    pub fn new(
        alias: impl Into<String>,
        identifier: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("alias", &self.alias)
            .field("identifier", &mask_identifier(&self.identifier))
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// A `HH:MM-HH:MM` time range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Schedule {
    /// Parse and validate a schedule string
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` when the format is wrong, a time is out of
    /// range, or the range is empty.
    pub fn parse(input: &str) -> Result<Self, ScheduleError> {
        static SCHEDULE_RE: OnceLock<Regex> = OnceLock::new();

        let re = SCHEDULE_RE.get_or_init(|| {
            Regex::new(r"^\s*(\d{2}:\d{2})\s*-\s*(\d{2}:\d{2})\s*$").expect("Invalid regex pattern")
        });

        let caps = re
            .captures(input)
            .ok_or_else(|| ScheduleError::InvalidFormat(input.to_string()))?;

        let start = parse_time(&caps[1])?;
        let end = parse_time(&caps[2])?;

        if start >= end {
            return Err(ScheduleError::EmptyRange(input.to_string()));
        }

        Ok(Self { start, end })
    }

    /// Start time as `HH:MM`
    pub fn start_str(&self) -> String {
        self.start.format(TIME_FORMAT).to_string()
    }

    /// End time as `HH:MM`
    pub fn end_str(&self) -> String {
        self.end.format(TIME_FORMAT).to_string()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_str(), self.end_str())
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| ScheduleError::InvalidTime(value.to_string()))
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ScheduleError::InvalidDate(value.to_string()))
}

/// The slot a run tries to claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSlot {
    pub date: NaiveDate,
    pub schedule: Schedule,
}

impl TargetSlot {
    /// Resolve a target slot from a date and a schedule string
    pub fn resolve(date: NaiveDate, schedule: &str) -> Result<Self, ScheduleError> {
        Ok(Self {
            date,
            schedule: Schedule::parse(schedule)?,
        })
    }

    /// Date as the intranet expects it
    pub fn date_str(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Start time used to discover booking links
    pub fn start_time(&self) -> String {
        self.schedule.start_str()
    }
}

/// Absolute URL that claims one court+time cell when fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingLink(String);

impl BookingLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal result of a booking run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Number of polling attempts made
    #[serde(default)]
    pub attempts: u32,
}

impl AttemptResult {
    /// Successful reservation
    pub fn booked(date: impl Into<String>, schedule: impl Into<String>, attempts: u32) -> Self {
        Self {
            success: true,
            date: Some(date.into()),
            schedule: Some(schedule.into()),
            message: Some("Reservation completed".to_string()),
            error: None,
            attempts,
        }
    }

    /// Failed run
    pub fn failed(error: impl Into<String>, attempts: u32) -> Self {
        Self {
            success: false,
            date: None,
            schedule: None,
            message: None,
            error: Some(error.into()),
            attempts,
        }
    }

    /// Attach the requested date and schedule for reporting
    #[must_use]
    pub fn for_request(mut self, date: impl Into<String>, schedule: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self.schedule = Some(schedule.into());
        self
    }
}
