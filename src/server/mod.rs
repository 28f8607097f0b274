//! HTTP trigger for scheduled booking runs
//!
//! # Endpoints
//!
//! - `GET|POST /?schedule=HH:MM-HH:MM` - Run one booking for today + day offset
//! - `GET /health` - Liveness check

pub mod api;
pub mod trigger;

pub use api::{create_router, status_for, TriggerParams};
pub use trigger::{AppState, TriggerServer};
