//! Booking attempt engine
//!
//! A run moves through
//! `Init → Authenticating → Polling ⇄ Attempting → Succeeded | Exhausted`.
//! Bad input, missing credentials, rejected logins and unrecoverable fetch
//! errors end the run at once; unavailable pages, empty slot lists and
//! rejected links only cost one attempt from the budget.

pub mod policy;

use chrono::{Days, Local, NaiveDate};
use std::fmt;

use crate::config::Config;
use crate::credentials::CredentialProvider;
use crate::error::{BookerErrorTrait, Result};
use crate::models::{parse_date, AttemptResult, TargetSlot, DATE_FORMAT};
use crate::parser::SlotScanner;
use crate::session::{BookingSession, IntranetSession};
use crate::utils::error::{BookingError, ScheduleError};

pub use policy::AttemptPolicy;

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    Init,
    Authenticating,
    Polling { attempt: u32 },
    Attempting { attempt: u32, candidates: usize },
    Succeeded,
    Exhausted,
    Failed,
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Authenticating => write!(f, "authenticating"),
            Self::Polling { attempt } => write!(f, "polling #{attempt}"),
            Self::Attempting {
                attempt,
                candidates,
            } => write!(f, "attempting #{attempt} ({candidates} courts)"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Exhausted => write!(f, "exhausted"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result of one polling attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A link was accepted
    Booked,
    /// The booking page could not be fetched
    PageUnavailable,
    /// The page had no free court at the target time
    NoSlots,
    /// Every discovered link was rejected
    AllRejected { tried: usize },
}

impl AttemptOutcome {
    /// Everything but a booking is worth another attempt
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Booked)
    }
}

/// Day being booked: `today` plus the configured offset
pub fn target_date(today: NaiveDate, day_offset: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(day_offset)))
        .unwrap_or(NaiveDate::MAX)
}

/// Day being booked, counted from the local calendar date
pub fn target_date_from_today(day_offset: u32) -> NaiveDate {
    target_date(Local::now().date_naive(), day_offset)
}

/// Check a requested date and schedule before any network traffic
///
/// Without `date` the day is today plus `day_offset`. Bad input comes back as
/// the failed result for that request, with no attempts made.
pub fn resolve_target(
    date: Option<&str>,
    schedule: &str,
    day_offset: u32,
) -> std::result::Result<TargetSlot, AttemptResult> {
    let rejected = |e: ScheduleError, date: String| {
        AttemptResult::failed(e.to_string(), 0).for_request(date, schedule)
    };

    let date = match date {
        Some(raw) => parse_date(raw).map_err(|e| rejected(e, raw.to_string()))?,
        None => target_date_from_today(day_offset),
    };

    TargetSlot::resolve(date, schedule)
        .map_err(|e| rejected(e, date.format(DATE_FORMAT).to_string()))
}

/// Drives a single booking run over an owned session
///
/// `run` consumes the orchestrator, so the session and its cookies are
/// dropped on every exit path.
pub struct BookingOrchestrator<S, P> {
    session: S,
    credentials: P,
    scanner: SlotScanner,
    policy: AttemptPolicy,
    state: BookingState,
    attempts_made: u32,
}

impl<P: CredentialProvider> BookingOrchestrator<IntranetSession, P> {
    /// Orchestrator over a fresh intranet session built from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP session cannot be created
    pub fn from_config(config: &Config, credentials: P) -> Result<Self> {
        let session = IntranetSession::from_config(config)?;
        let scanner = SlotScanner::new(session.base_url().clone());
        Ok(Self::new(
            session,
            credentials,
            scanner,
            AttemptPolicy::from_config(config),
        ))
    }
}

impl<S: BookingSession, P: CredentialProvider> BookingOrchestrator<S, P> {
    pub fn new(session: S, credentials: P, scanner: SlotScanner, policy: AttemptPolicy) -> Self {
        Self {
            session,
            credentials,
            scanner,
            policy,
            state: BookingState::Init,
            attempts_made: 0,
        }
    }

    /// Try to book `schedule` (`HH:MM-HH:MM`) on `date`
    ///
    /// Always produces exactly one result; failures are reported in it rather
    /// than returned as errors.
    pub async fn run(mut self, date: NaiveDate, schedule: &str) -> AttemptResult {
        tracing::info!(date = %date, schedule, "Booking run started");

        match self.execute(date, schedule).await {
            Ok(slot) => {
                tracing::info!(
                    date = %slot.date_str(),
                    schedule = %slot.schedule,
                    attempts = self.attempts_made,
                    "Reservation completed"
                );
                AttemptResult::booked(
                    slot.date_str(),
                    slot.schedule.to_string(),
                    self.attempts_made,
                )
            }
            Err(e) => {
                if !matches!(self.state, BookingState::Exhausted) {
                    self.transition(BookingState::Failed);
                }
                tracing::error!(
                    error = %e,
                    category = e.category().label(),
                    attempts = self.attempts_made,
                    "Booking run failed"
                );
                AttemptResult::failed(e.to_string(), self.attempts_made)
                    .for_request(date.format(DATE_FORMAT).to_string(), schedule)
            }
        }
    }

    async fn execute(
        &mut self,
        date: NaiveDate,
        schedule: &str,
    ) -> std::result::Result<TargetSlot, BookingError> {
        let slot = TargetSlot::resolve(date, schedule)?;

        self.transition(BookingState::Authenticating);
        let credentials = self.credentials.credentials().await?;
        tracing::info!(
            alias = %credentials.alias,
            provider = self.credentials.name(),
            "Credentials loaded"
        );

        if !self.session.authenticate(&credentials).await {
            return Err(BookingError::LoginFailed {
                alias: credentials.alias.clone(),
            });
        }

        for attempt in 1..=self.policy.max_attempts {
            self.attempts_made = attempt;
            self.transition(BookingState::Polling { attempt });

            let outcome = self.attempt(&slot, attempt).await?;
            if !outcome.is_retryable() {
                self.transition(BookingState::Succeeded);
                return Ok(slot);
            }

            tracing::warn!(
                attempt,
                max_attempts = self.policy.max_attempts,
                outcome = ?outcome,
                "Attempt failed"
            );

            if self.policy.pauses_after(attempt) {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        self.transition(BookingState::Exhausted);
        Err(BookingError::Exhausted {
            attempts: self.attempts_made,
        })
    }

    /// One fetch, scan and submit cycle
    ///
    /// Only a fetch error that no retry can fix escapes as `Err`.
    async fn attempt(
        &mut self,
        slot: &TargetSlot,
        attempt: u32,
    ) -> std::result::Result<AttemptOutcome, BookingError> {
        let html = match self.session.fetch_booking_page(slot.date).await {
            Ok(Some(html)) => html,
            Ok(None) => return Ok(AttemptOutcome::PageUnavailable),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(error = %e, "Booking page fetch failed");
                return Ok(AttemptOutcome::PageUnavailable);
            }
            Err(e) => return Err(e.into()),
        };

        let links = self.scanner.scan(&html, &slot.start_time());
        if links.is_empty() {
            tracing::info!(start = %slot.start_time(), "No court available yet");
            return Ok(AttemptOutcome::NoSlots);
        }

        let candidates = links.len();
        self.transition(BookingState::Attempting {
            attempt,
            candidates,
        });

        for link in links {
            if self.session.attempt_booking(&link).await {
                return Ok(AttemptOutcome::Booked);
            }
        }

        Ok(AttemptOutcome::AllRejected { tried: candidates })
    }

    fn transition(&mut self, next: BookingState) {
        tracing::debug!(from = %self.state, to = %next, "State transition");
        self.state = next;
    }
}
