//! Infrastructure layer - external concerns

pub mod clock;
pub mod crypto;

pub use clock::{ManualClock, SystemClock};
