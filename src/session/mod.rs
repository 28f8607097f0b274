//! Authenticated HTTP session against the intranet
//!
//! This module wraps a cookie-carrying `reqwest` client and exposes the three
//! operations the booking loop needs:
//! - Form login
//! - Booking page download (ISO-8859-15 decoding)
//! - Booking link submission with redirect-aware success detection

pub mod detect;
pub mod headers;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{redirect, Client, Response};
use std::time::Duration;
use url::Url;

use crate::config::{Config, SiteConfig};
use crate::models::{BookingLink, Credentials, DATE_FORMAT};
use crate::utils::error::FetchError;
use crate::utils::{decode_body, decode_latin9, mask_identifier, truncate_text};

use self::detect::{ResponseClassifier, ResponseView};
use self::headers::build_browser_headers;

const MAX_REDIRECTS: usize = 10;

/// Operations the booking loop performs over an authenticated channel
///
/// Outcomes are plain booleans; how they are detected is the session's concern.
#[async_trait]
pub trait BookingSession: Send + Sync {
    /// Log in once; `false` for any rejected, unrecognised or failed login
    async fn authenticate(&self, credentials: &Credentials) -> bool;

    /// Download the booking page for `date`; `Ok(None)` when the server refuses it
    async fn fetch_booking_page(&self, date: NaiveDate) -> Result<Option<String>, FetchError>;

    /// Follow a booking link; `true` when the reservation went through
    async fn attempt_booking(&self, link: &BookingLink) -> bool;
}

/// A fully read response
#[derive(Debug)]
struct FetchedPage {
    status: u16,
    final_url: String,
    body: String,
}

impl FetchedPage {
    fn view(&self) -> ResponseView<'_> {
        ResponseView {
            status: self.status,
            final_url: &self.final_url,
            body: &self.body,
        }
    }
}

/// Cookie-carrying session against the UPV intranet
pub struct IntranetSession {
    /// HTTP client with cookie store, timeout and redirect policy
    client: Client,

    /// Intranet endpoints
    site: SiteConfig,

    /// Parsed `site.base_url`
    base_url: Url,

    /// Success heuristics
    classifier: ResponseClassifier,
}

impl IntranetSession {
    /// Create a session for the configured intranet
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for a bad base URL and
    /// `FetchError::Http` if the HTTP client cannot be created
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(config.site.clone(), config.request_timeout())
    }

    /// Create a session with explicit site settings and request timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for a bad base URL and
    /// `FetchError::Http` if the HTTP client cannot be created
    pub fn new(site: SiteConfig, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = Url::parse(&site.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", site.base_url)))?;

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .cookie_store(true)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            site,
            base_url,
            classifier: ResponseClassifier::default(),
        })
    }

    /// Replace the success heuristics
    #[must_use]
    pub fn with_classifier(mut self, classifier: ResponseClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Base URL that relative booking links resolve against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the booking page for a date
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the configured path cannot be joined
    pub fn booking_page_url(&self, date: NaiveDate) -> Result<Url, FetchError> {
        let mut url = self.endpoint(&self.site.booking_path)?;
        url.query_pairs_mut()
            .append_pair("p_res_tipo", &self.site.facility)
            .append_pair("p_fecha", &date.format(DATE_FORMAT).to_string());
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn read_page(response: Response) -> Result<FetchedPage, FetchError> {
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response.bytes().await.map_err(FetchError::from_transport)?;

        Ok(FetchedPage {
            status,
            final_url,
            body: decode_body(&bytes, &content_type),
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<FetchedPage, FetchError> {
        let url = self.endpoint(&self.site.login_path)?;
        let form = [
            ("id", "c"),
            ("estession", ""),
            ("p_usuario", credentials.identifier.as_str()),
            ("p_clave", credentials.secret.as_str()),
        ];

        let response = self
            .client
            .post(url)
            .headers(build_browser_headers(&self.site.user_agent, Some(self.base_url.as_str())))
            .form(&form)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        Self::read_page(response).await
    }
}

#[async_trait]
impl BookingSession for IntranetSession {
    async fn authenticate(&self, credentials: &Credentials) -> bool {
        let page = match self.login(credentials).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(alias = %credentials.alias, error = %e, "Login request failed");
                return false;
            }
        };

        let logged_in = self.classifier.is_logged_in(&page.view());

        if logged_in {
            tracing::info!(
                alias = %credentials.alias,
                identifier = %mask_identifier(&credentials.identifier),
                "Login succeeded"
            );
        } else {
            tracing::warn!(
                alias = %credentials.alias,
                status = page.status,
                body = %truncate_text(&page.body, 200),
                "Login rejected"
            );
        }

        logged_in
    }

    async fn fetch_booking_page(&self, date: NaiveDate) -> Result<Option<String>, FetchError> {
        let url = self.booking_page_url(date)?;

        tracing::debug!(url = %url, "Fetching booking page");

        let response = self
            .client
            .get(url)
            .headers(build_browser_headers(&self.site.user_agent, Some(self.base_url.as_str())))
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if status.as_u16() != 200 {
            tracing::warn!(status = status.as_u16(), "Booking page unavailable");
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(FetchError::from_transport)?;
        Ok(Some(decode_latin9(&bytes)))
    }

    async fn attempt_booking(&self, link: &BookingLink) -> bool {
        let response = self
            .client
            .get(link.as_str())
            .headers(build_browser_headers(&self.site.user_agent, Some(self.base_url.as_str())))
            .send()
            .await
            .map_err(FetchError::from_transport);

        let page = match response {
            Ok(response) => Self::read_page(response).await,
            Err(e) => Err(e),
        };

        match page {
            Ok(page) => {
                let booked = self.classifier.is_booked(&page.view());
                tracing::debug!(
                    link = %link,
                    status = page.status,
                    final_url = %page.final_url,
                    booked,
                    "Booking link followed"
                );
                booked
            }
            Err(e) => {
                tracing::warn!(link = %link, error = %e, "Booking request failed");
                false
            }
        }
    }
}
