//! Application layer — use-cases over the domain

pub mod identity;
pub mod parking;
pub mod session;

pub use identity::IdentityService;
pub use parking::ParkingService;
pub use session::{Action, Feedback, SessionController};
