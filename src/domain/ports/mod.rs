//! Domain ports
//!
//! Trait contracts the domain core needs from the outside world.

pub mod clock;

pub use clock::Clock;
