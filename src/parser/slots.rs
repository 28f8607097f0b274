//! Booking link discovery
//!
//! The booking page renders one table cell per court and hour. Free cells
//! carry an anchor pointing at the `solicita_reservar` action with the slot's
//! start time in the `p_res_horaini` parameter, e.g.
//!
//! ```text
//! <a href="/pls/soalu/sic_depreservas.solicita_reservar?p_pista=3&amp;p_res_horaini=20:00:00">
//! ```

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use url::Url;

use crate::models::BookingLink;

/// Token present in every reservation action reference
pub const RESERVATION_MARKER: &str = "solicita_reservar";

/// Query parameter carrying the slot start time
pub const START_TIME_PARAM: &str = "p_res_horaini";

lazy_static! {
    static ref ANCHOR: Selector = Selector::parse("a[href]").expect("Invalid CSS selector: a[href]");
}

/// Extracts reservation links for a start time from booking page markup
#[derive(Debug, Clone)]
pub struct SlotScanner {
    base: Url,
}

impl SlotScanner {
    /// Create a scanner resolving relative references against `base`
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Create a scanner from a base URL string
    ///
    /// # Errors
    ///
    /// Returns the parse error when `base` is not an absolute URL
    pub fn from_base_str(base: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(base)?))
    }

    /// Find every reservation link for `target_time` (`HH:MM`), in document order
    ///
    /// Returns an empty vector when no cell is free yet. Broken markup is
    /// repaired by the HTML5 tree builder, so this never fails.
    pub fn scan(&self, html: &str, target_time: &str) -> Vec<BookingLink> {
        let document = Html::parse_document(html);
        let wanted = format!("{target_time}:00");

        let links: Vec<BookingLink> = document
            .select(&ANCHOR)
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter_map(|href| self.match_reference(href, &wanted))
            .collect();

        tracing::debug!(
            target_time,
            found = links.len(),
            "Scanned booking page"
        );

        links
    }

    fn match_reference(&self, href: &str, wanted: &str) -> Option<BookingLink> {
        // The parser already unescapes attributes; some cells are double-encoded.
        let href = href.trim().replace("&amp;", "&");

        if !href.contains(RESERVATION_MARKER) {
            return None;
        }

        let url = match self.base.join(&href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(href = %href, error = %e, "Skipping unresolvable reference");
                return None;
            }
        };

        let starts_at_target = url
            .query_pairs()
            .any(|(key, value)| key == START_TIME_PARAM && value == wanted);

        starts_at_target.then(|| BookingLink::new(url.as_str()))
    }
}
