use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Start and checkout timestamps come from here so elapsed-time billing
/// can be driven deterministically in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
