//! Configuration management for padel-booker
//!
//! This module handles loading and validating configuration from environment variables
//! and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::booking::AttemptPolicy;
use crate::models::Schedule;

/// Default browser user agent sent to the intranet
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Booking loop configuration
    pub booking: BookingConfig,

    /// Intranet endpoints and HTTP client settings
    pub site: SiteConfig,

    /// Where credentials come from
    pub credentials: CredentialsConfig,

    /// HTTP trigger configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Booking loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Desired time range, `HH:MM-HH:MM`
    pub schedule: String,

    /// Maximum number of polling attempts
    pub max_attempts: u32,

    /// Delay between attempts in seconds
    pub attempt_delay_secs: u64,

    /// Days between today and the day being booked
    pub day_offset: u32,

    /// External invocation timeout the whole run must fit in, in seconds
    pub run_deadline_secs: u64,
}

/// Intranet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the intranet, also used to resolve relative links
    pub base_url: String,

    /// Path of the login form action
    pub login_path: String,

    /// Path of the booking page
    pub booking_path: String,

    /// Facility type requested from the booking page
    pub facility: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,
}

/// Credential source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    /// Environment variables named after the secrets
    Env,
    /// One file per secret inside `secrets_dir`
    Files,
}

/// Credential configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub source: CredentialSource,

    /// Directory with mounted secret files
    pub secrets_dir: PathBuf,

    pub alias_secret: String,
    pub identifier_secret: String,
    pub password_secret: String,
}

/// HTTP trigger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,

    /// Log every request through `TraceLayer`
    pub enable_request_logging: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Load configuration from a file; environment variables still take precedence
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(schedule) = lookup("PADEL_SCHEDULE") {
            self.booking.schedule = schedule;
        }

        if let Some(v) = lookup("PADEL_MAX_ATTEMPTS") {
            self.booking.max_attempts = v
                .parse()
                .with_context(|| format!("PADEL_MAX_ATTEMPTS is not a number: {v}"))?;
        }

        if let Some(v) = lookup("PADEL_ATTEMPT_DELAY") {
            self.booking.attempt_delay_secs = v
                .parse()
                .with_context(|| format!("PADEL_ATTEMPT_DELAY is not a number: {v}"))?;
        }

        if let Some(v) = lookup("PADEL_DAY_OFFSET") {
            self.booking.day_offset = v
                .parse()
                .with_context(|| format!("PADEL_DAY_OFFSET is not a number: {v}"))?;
        }

        if let Some(v) = lookup("PADEL_RUN_DEADLINE") {
            self.booking.run_deadline_secs = v
                .parse()
                .with_context(|| format!("PADEL_RUN_DEADLINE is not a number: {v}"))?;
        }

        if let Some(base_url) = lookup("PADEL_BASE_URL") {
            self.site.base_url = base_url;
        }

        if let Some(v) = lookup("PADEL_REQUEST_TIMEOUT") {
            self.site.request_timeout_secs = v
                .parse()
                .with_context(|| format!("PADEL_REQUEST_TIMEOUT is not a number: {v}"))?;
        }

        if let Some(user_agent) = lookup("PADEL_USER_AGENT") {
            self.site.user_agent = user_agent;
        }

        if let Some(dir) = lookup("PADEL_SECRETS_DIR") {
            self.credentials.secrets_dir = PathBuf::from(dir);
            self.credentials.source = CredentialSource::Files;
        }

        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {port}"))?;
            self.server.bind_address.set_port(port);
        }

        if let Some(level) = lookup("PADEL_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("PADEL_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        Schedule::parse(&self.booking.schedule).context("Invalid booking schedule")?;

        if self.booking.max_attempts == 0 {
            anyhow::bail!("max_attempts must be greater than 0");
        }

        let deadline = Duration::from_secs(self.booking.run_deadline_secs);
        let fits = AttemptPolicy::from_config(self)
            .total_wait()
            .is_some_and(|waiting| waiting < deadline);
        if !fits {
            anyhow::bail!(
                "{} attempts with {}s delay do not fit in the {}s run deadline",
                self.booking.max_attempts,
                self.booking.attempt_delay_secs,
                self.booking.run_deadline_secs
            );
        }

        url::Url::parse(&self.site.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.site.base_url))?;

        if self.site.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be 'text' or 'json'");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.site.request_timeout_secs)
    }

    /// Get the inter-attempt delay as Duration
    #[must_use]
    pub fn attempt_delay(&self) -> Duration {
        Duration::from_secs(self.booking.attempt_delay_secs)
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            schedule: String::from("20:00-21:00"),
            max_attempts: 8,
            attempt_delay_secs: 15,
            day_offset: 8,
            run_deadline_secs: 540,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://intranet.upv.es"),
            login_path: String::from("/pls/soalu/est_aute.intraalucomp"),
            booking_path: String::from("/pls/soalu/sic_depreservas.Reservar"),
            facility: String::from("PDEL"),
            request_timeout_secs: 30,
            user_agent: String::from(DEFAULT_USER_AGENT),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            source: CredentialSource::Env,
            secrets_dir: PathBuf::from("/secrets"),
            alias_secret: String::from("padel-alias"),
            identifier_secret: String::from("padel-dni"),
            password_secret: String::from("padel-password"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            enable_request_logging: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            booking: BookingConfig::default(),
            site: SiteConfig::default(),
            credentials: CredentialsConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
