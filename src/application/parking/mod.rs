//! Parking — slot lifecycle use-cases

mod service;

pub use service::ParkingService;
