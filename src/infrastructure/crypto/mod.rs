//! Password hashing and token signing

pub mod jwt;
pub mod password;
