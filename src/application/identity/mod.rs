//! Identity — login against the configured user table

mod service;

pub use service::IdentityService;
