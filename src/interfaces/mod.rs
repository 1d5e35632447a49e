//! Front ends: the operator console and the REST API

pub mod console;
pub mod http;
