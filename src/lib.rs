//! # Smart Parking
//!
//! Single-site parking lot manager: a fixed set of numbered slots that can
//! be parked in, pre-booked and checked out, with per-minute fares.
//!
//! ## Architecture
//!
//! - **domain**: slots, tariff and fare rules, users
//! - **application**: parking, identity and session use cases
//! - **infrastructure**: clocks, password hashing, JWT
//! - **interfaces**: interactive console and REST API
//! - **server**: wiring, tracing setup and the REST runtime

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};
pub use interfaces::http::create_api_router;
