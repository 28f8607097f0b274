//! HTML parsing for the intranet booking page
//!
//! - [`slots`] - Reservation link discovery

pub mod slots;

pub use slots::{SlotScanner, RESERVATION_MARKER, START_TIME_PARAM};
