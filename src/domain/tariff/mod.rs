//! Tariff aggregate
//!
//! Per-minute rates, the pre-booking surcharge, fare calculation and the
//! receipt produced by a checkout.

pub mod model;

pub use model::{elapsed_minutes, FareBreakdown, Receipt, Tariff};
