//! Slot registry — owns every slot of the lot and performs the
//! lifecycle transitions on them.
//!
//! The registry is pure: the current time is passed in by the caller and
//! nothing is logged here. [`ParkingService`](crate::application::ParkingService)
//! wraps it with a clock and tracing.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use super::model::{Slot, SlotId, SlotState, SlotStatus, Vehicle, VehicleType};
use crate::domain::tariff::{elapsed_minutes, Receipt, Tariff};
use crate::shared::errors::{DomainError, DomainResult};

/// Slot counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SlotSummary {
    pub total: usize,
    pub empty: usize,
    pub reserved: usize,
    pub occupied: usize,
}

/// Fixed, ordered set of slots `1..=N`
#[derive(Debug, Clone)]
pub struct SlotRegistry {
    slots: Vec<Slot>,
}

impl SlotRegistry {
    pub fn new(num_slots: u32) -> Self {
        Self {
            slots: (1..=num_slots).map(Slot::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, slot_id: SlotId) -> bool {
        slot_id >= 1 && (slot_id as usize) <= self.slots.len()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: SlotId) -> DomainResult<&Slot> {
        if !self.contains(slot_id) {
            return Err(DomainError::slot_not_found(slot_id));
        }
        Ok(&self.slots[slot_id as usize - 1])
    }

    fn slot_mut(&mut self, slot_id: SlotId) -> DomainResult<&mut Slot> {
        if !self.contains(slot_id) {
            return Err(DomainError::slot_not_found(slot_id));
        }
        Ok(&mut self.slots[slot_id as usize - 1])
    }

    pub fn summary(&self) -> SlotSummary {
        self.slots.iter().fold(
            SlotSummary {
                total: self.slots.len(),
                ..SlotSummary::default()
            },
            |mut acc, slot| {
                match slot.status() {
                    SlotStatus::Empty => acc.empty += 1,
                    SlotStatus::Reserved => acc.reserved += 1,
                    SlotStatus::Occupied => acc.occupied += 1,
                }
                acc
            },
        )
    }

    /// Park a vehicle immediately.
    ///
    /// Allowed on an empty or reserved slot; a reservation is discarded.
    /// Returns the status the slot had before.
    pub fn park_now(
        &mut self,
        slot_id: SlotId,
        plate: &str,
        vehicle_type: VehicleType,
        now: DateTime<Utc>,
    ) -> DomainResult<SlotStatus> {
        let plate = normalize_plate(plate)?;
        let slot = self.slot_mut(slot_id)?;

        let previous = slot.status();
        if previous == SlotStatus::Occupied {
            return Err(DomainError::Conflict(format!(
                "Slot {} is already occupied",
                slot_id
            )));
        }

        slot.state = SlotState::Occupied {
            vehicle: Vehicle::new(plate, vehicle_type),
            started_at: now,
            is_prebook: false,
        };
        Ok(previous)
    }

    /// Reserve a slot for a future arrival.
    ///
    /// Overwrites whatever the slot holds, an active occupancy included.
    /// Returns the status the slot had before.
    pub fn reserve(
        &mut self,
        slot_id: SlotId,
        plate: &str,
        vehicle_type: VehicleType,
        reserved_for: &str,
        reserve_time: NaiveDateTime,
    ) -> DomainResult<SlotStatus> {
        let plate = normalize_plate(plate)?;
        let slot = self.slot_mut(slot_id)?;

        let previous = slot.status();
        slot.state = SlotState::Reserved {
            vehicle: Vehicle::new(plate, vehicle_type),
            reserved_for: reserved_for.to_string(),
            reserve_time,
        };
        Ok(previous)
    }

    /// Convert a reservation into an active occupancy starting `now`.
    pub fn mark_arrived(&mut self, slot_id: SlotId, now: DateTime<Utc>) -> DomainResult<&Slot> {
        let slot = self.slot_mut(slot_id)?;

        let SlotState::Reserved { vehicle, .. } = &slot.state else {
            return Err(DomainError::InvalidState(format!(
                "Slot {} is {}, not reserved",
                slot_id,
                slot.status()
            )));
        };

        slot.state = SlotState::Occupied {
            vehicle: vehicle.clone(),
            started_at: now,
            is_prebook: true,
        };
        Ok(&*slot)
    }

    /// Vacate an occupied slot, compute the fare and reset the slot.
    ///
    /// The fare is computed before anything changes, so a tariff error
    /// leaves the slot occupied.
    pub fn checkout(
        &mut self,
        slot_id: SlotId,
        tariff: &Tariff,
        now: DateTime<Utc>,
    ) -> DomainResult<Receipt> {
        let slot = self.slot_mut(slot_id)?;

        let SlotState::Occupied {
            vehicle,
            started_at,
            is_prebook,
        } = &slot.state
        else {
            return Err(DomainError::InvalidState(format!(
                "Slot {} is {}, not occupied",
                slot_id,
                slot.status()
            )));
        };

        let minutes = elapsed_minutes(*started_at, now);
        let breakdown =
            tariff.calculate_fare_breakdown(vehicle.vehicle_type, minutes, *is_prebook)?;

        let receipt = Receipt {
            id: Uuid::new_v4(),
            slot_id,
            plate: vehicle.plate.clone(),
            vehicle_type: vehicle.vehicle_type,
            started_at: *started_at,
            ended_at: now,
            minutes,
            is_prebook: *is_prebook,
            base_fare: breakdown.base,
            surcharge: breakdown.surcharge,
            fare: breakdown.total,
            currency: breakdown.currency,
        };

        slot.clear();
        Ok(receipt)
    }

    /// First slot, by ascending id, whose plate equals `query` ignoring case.
    pub fn find_by_plate(&self, query: &str) -> DomainResult<&Slot> {
        let query = query.trim();
        self.slots
            .iter()
            .find(|slot| slot.vehicle().is_some_and(|v| v.matches_plate(query)))
            .ok_or_else(|| DomainError::NotFound {
                entity: "Vehicle",
                field: "plate",
                value: query.to_string(),
            })
    }
}

/// Longest vehicle number accepted, in characters, after trimming.
pub const MAX_PLATE_LEN: usize = 16;

fn normalize_plate(plate: &str) -> DomainResult<&str> {
    let plate = plate.trim();
    if plate.is_empty() {
        return Err(DomainError::Validation(
            "Vehicle number must not be empty".into(),
        ));
    }
    if plate.chars().count() > MAX_PLATE_LEN {
        return Err(DomainError::Validation(format!(
            "Vehicle number must be at most {} characters",
            MAX_PLATE_LEN
        )));
    }
    Ok(plate)
}

// ── Tests ──────────────────────────────────────────────────────
