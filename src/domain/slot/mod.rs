//! Slot aggregate
//!
//! Contains the Slot entity, its lifecycle states and the registry that
//! owns all slots of the lot.

pub mod model;
pub mod registry;

pub use model::{Slot, SlotId, SlotState, SlotStatus, Vehicle, VehicleType};
pub use registry::{SlotRegistry, SlotSummary};
