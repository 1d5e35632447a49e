pub mod dto;
pub mod handlers;

pub use handlers::{arrive, checkout, get_slot, list_slots, park, reserve, search, summary};
