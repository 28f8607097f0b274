//! Success detection for intranet responses
//!
//! The intranet has no status contract: a rejected login and a rejected
//! booking both come back as `200 OK` HTML. Outcomes are read from several
//! weak signals instead, and all of them live here so the booking loop only
//! ever sees a boolean.

use crate::parser::RESERVATION_MARKER;

/// Fragments that only appear on pages reachable after logging in
pub const LOGIN_MARKERS: &[&str] = &["col_horarios", "depreservas", "reserva"];

/// Phrases shown when a reservation is accepted
pub const CONFIRMATION_PHRASES: &[&str] = &["reserva realizada", "confirmada", "éxito"];

/// A response reduced to what the classifier looks at
#[derive(Debug, Clone, Copy)]
pub struct ResponseView<'a> {
    pub status: u16,
    pub final_url: &'a str,
    pub body: &'a str,
}

/// Classifies ambiguous intranet responses into success or failure
#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    login_markers: Vec<String>,
    confirmation_phrases: Vec<String>,
    action_marker: String,
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self::new(LOGIN_MARKERS, CONFIRMATION_PHRASES, RESERVATION_MARKER)
    }
}

impl ResponseClassifier {
    /// Create a classifier with a custom signal set; matching is case-insensitive
    pub fn new(login_markers: &[&str], confirmation_phrases: &[&str], action_marker: &str) -> Self {
        Self {
            login_markers: login_markers.iter().map(|m| m.to_lowercase()).collect(),
            confirmation_phrases: confirmation_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            action_marker: action_marker.to_string(),
        }
    }

    /// A login succeeded when the server answers 200 with a post-login page
    pub fn is_logged_in(&self, response: &ResponseView<'_>) -> bool {
        if response.status != 200 {
            return false;
        }

        let body = response.body.to_lowercase();
        self.login_markers.iter().any(|m| body.contains(m.as_str()))
    }

    /// A booking succeeded when the page confirms it or the server moved past the action
    pub fn is_booked(&self, response: &ResponseView<'_>) -> bool {
        if response.status != 200 {
            return false;
        }

        let body = response.body.to_lowercase();
        if self
            .confirmation_phrases
            .iter()
            .any(|p| body.contains(p.as_str()))
        {
            return true;
        }

        !response.final_url.contains(&self.action_marker)
    }
}
