//! Domain layer — slots, tariffs and users.

pub mod ports;
pub mod slot;
pub mod tariff;
pub mod user;

pub use ports::Clock;
pub use slot::{Slot, SlotId, SlotRegistry, SlotState, SlotStatus, SlotSummary, Vehicle, VehicleType};
pub use tariff::{FareBreakdown, Receipt, Tariff};
pub use user::{User, UserRole};

pub use crate::shared::errors::{DomainError, DomainResult};
