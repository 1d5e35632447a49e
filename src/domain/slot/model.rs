//! Slot domain entity

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

/// Slot identifier, `1..=N`.
pub type SlotId = u32;

/// Vehicle type, selects the per-minute rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Bike,
    Heavy,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [Self::Car, Self::Bike, Self::Heavy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Bike => "bike",
            Self::Heavy => "heavy",
        }
    }
}

impl FromStr for VehicleType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(Self::Car),
            "bike" => Ok(Self::Bike),
            "heavy" => Ok(Self::Heavy),
            _ => Err(DomainError::InvalidVehicleType(s.to_string())),
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Empty,
    Reserved,
    Occupied,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Reserved => "reserved",
            Self::Occupied => "occupied",
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle held by a non-empty slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub plate: String,
    pub vehicle_type: VehicleType,
}

impl Vehicle {
    pub fn new(plate: impl Into<String>, vehicle_type: VehicleType) -> Self {
        Self {
            plate: plate.into(),
            vehicle_type,
        }
    }

    /// Case-insensitive exact plate comparison
    pub fn matches_plate(&self, query: &str) -> bool {
        self.plate.to_lowercase() == query.to_lowercase()
    }
}

/// State of a slot. Each variant carries exactly the fields that are
/// meaningful for it, so an empty slot can never hold a plate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Reserved {
        vehicle: Vehicle,
        /// Username the slot is held for
        reserved_for: String,
        /// Wall-clock time the reservation targets
        reserve_time: NaiveDateTime,
    },
    Occupied {
        vehicle: Vehicle,
        started_at: DateTime<Utc>,
        /// Occupancy originated from a reservation (surcharged)
        is_prebook: bool,
    },
}

/// A fixed-identity parking slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    id: SlotId,
    pub state: SlotState,
}

impl Slot {
    pub fn new(id: SlotId) -> Self {
        Self {
            id,
            state: SlotState::Empty,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn status(&self) -> SlotStatus {
        match self.state {
            SlotState::Empty => SlotStatus::Empty,
            SlotState::Reserved { .. } => SlotStatus::Reserved,
            SlotState::Occupied { .. } => SlotStatus::Occupied,
        }
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        match &self.state {
            SlotState::Empty => None,
            SlotState::Reserved { vehicle, .. } | SlotState::Occupied { vehicle, .. } => {
                Some(vehicle)
            }
        }
    }

    pub fn plate(&self) -> Option<&str> {
        self.vehicle().map(|v| v.plate.as_str())
    }

    pub fn vehicle_type(&self) -> Option<VehicleType> {
        self.vehicle().map(|v| v.vehicle_type)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            SlotState::Occupied { started_at, .. } => Some(started_at),
            _ => None,
        }
    }

    pub fn reserved_for(&self) -> Option<&str> {
        match &self.state {
            SlotState::Reserved { reserved_for, .. } => Some(reserved_for),
            _ => None,
        }
    }

    pub fn reserve_time(&self) -> Option<NaiveDateTime> {
        match self.state {
            SlotState::Reserved { reserve_time, .. } => Some(reserve_time),
            _ => None,
        }
    }

    /// A reservation is always a pre-booking; an occupancy only when it
    /// was converted from one.
    pub fn is_prebook(&self) -> bool {
        match self.state {
            SlotState::Empty => false,
            SlotState::Reserved { .. } => true,
            SlotState::Occupied { is_prebook, .. } => is_prebook,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state == SlotState::Empty
    }

    /// Reset to empty, dropping every booking field
    pub fn clear(&mut self) {
        self.state = SlotState::Empty;
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reserve_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 20)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn new_slot_is_empty() {
        let slot = Slot::new(1);
        assert_eq!(slot.id(), 1);
        assert_eq!(slot.status(), SlotStatus::Empty);
        assert!(slot.plate().is_none());
        assert!(slot.vehicle_type().is_none());
        assert!(slot.started_at().is_none());
        assert!(slot.reserved_for().is_none());
        assert!(!slot.is_prebook());
    }

    #[test]
    fn reserved_slot_exposes_reservation_fields() {
        let mut slot = Slot::new(5);
        slot.state = SlotState::Reserved {
            vehicle: Vehicle::new("KA02XY9999", VehicleType::Bike),
            reserved_for: "user".into(),
            reserve_time: reserve_time(),
        };
        assert_eq!(slot.status(), SlotStatus::Reserved);
        assert_eq!(slot.plate(), Some("KA02XY9999"));
        assert_eq!(slot.reserved_for(), Some("user"));
        assert_eq!(slot.reserve_time(), Some(reserve_time()));
        assert!(slot.started_at().is_none());
        assert!(slot.is_prebook());
    }

    #[test]
    fn clear_drops_all_fields() {
        let mut slot = Slot::new(2);
        slot.state = SlotState::Occupied {
            vehicle: Vehicle::new("KA01AB1234", VehicleType::Car),
            started_at: Utc::now(),
            is_prebook: true,
        };
        slot.clear();
        assert!(slot.is_empty());
        assert!(slot.vehicle().is_none());
        assert!(!slot.is_prebook());
    }

    #[test]
    fn vehicle_type_parses_case_insensitively() {
        assert_eq!("Car".parse::<VehicleType>().unwrap(), VehicleType::Car);
        assert_eq!(" BIKE ".parse::<VehicleType>().unwrap(), VehicleType::Bike);
        assert_eq!("heavy".parse::<VehicleType>().unwrap(), VehicleType::Heavy);
    }

    #[test]
    fn unknown_vehicle_type_is_rejected() {
        let err = "truck".parse::<VehicleType>().unwrap_err();
        assert_eq!(err, DomainError::InvalidVehicleType("truck".into()));
    }

    #[test]
    fn plate_match_ignores_case_but_not_substrings() {
        let v = Vehicle::new("KA01AB1234", VehicleType::Car);
        assert!(v.matches_plate("ka01ab1234"));
        assert!(!v.matches_plate("KA01"));
    }
}
