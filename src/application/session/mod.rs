//! Interactive session state

mod controller;

pub use controller::{Action, Feedback, SessionController};
