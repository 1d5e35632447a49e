//! HTTP REST API
//!
//! - `common`: response envelope, validated JSON, error mapping
//! - `middleware`: bearer JWT authentication
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

pub use router::create_api_router;
pub use state::AppState;
