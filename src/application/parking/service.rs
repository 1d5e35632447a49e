//! Parking service — the slot registry bound to a tariff and a clock
//!
//! All slot mutations go through here so every transition is logged
//! and timestamped from the same clock.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::domain::{
    Clock, DomainResult, Receipt, Slot, SlotId, SlotRegistry, SlotStatus, SlotSummary, Tariff,
    VehicleType,
};

pub struct ParkingService {
    registry: SlotRegistry,
    tariff: Tariff,
    clock: Arc<dyn Clock>,
}

impl ParkingService {
    pub fn new(num_slots: u32, tariff: Tariff, clock: Arc<dyn Clock>) -> Self {
        info!(num_slots, currency = tariff.currency(), "Parking lot initialised");
        Self {
            registry: SlotRegistry::new(num_slots),
            tariff,
            clock,
        }
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    pub fn num_slots(&self) -> usize {
        self.registry.len()
    }

    pub fn contains(&self, slot_id: SlotId) -> bool {
        self.registry.contains(slot_id)
    }

    pub fn slots(&self) -> &[Slot] {
        self.registry.slots()
    }

    pub fn slot(&self, slot_id: SlotId) -> DomainResult<&Slot> {
        self.registry.slot(slot_id)
    }

    pub fn summary(&self) -> SlotSummary {
        self.registry.summary()
    }

    pub fn park_now(
        &mut self,
        slot_id: SlotId,
        plate: &str,
        vehicle_type: VehicleType,
    ) -> DomainResult<&Slot> {
        let now = self.clock.now();
        let previous = self
            .registry
            .park_now(slot_id, plate, vehicle_type, now)
            .inspect_err(|e| warn!(slot_id, error = %e, "Park rejected"))?;

        if previous == SlotStatus::Reserved {
            warn!(slot_id, "Reservation discarded by walk-in parking");
        }
        info!(slot_id, plate = plate.trim(), %vehicle_type, "Vehicle parked");
        self.registry.slot(slot_id)
    }

    pub fn reserve(
        &mut self,
        slot_id: SlotId,
        plate: &str,
        vehicle_type: VehicleType,
        reserved_for: &str,
        reserve_time: NaiveDateTime,
    ) -> DomainResult<&Slot> {
        let previous = self
            .registry
            .reserve(slot_id, plate, vehicle_type, reserved_for, reserve_time)
            .inspect_err(|e| warn!(slot_id, error = %e, "Reservation rejected"))?;

        match previous {
            SlotStatus::Occupied => {
                warn!(slot_id, "Reservation replaced an active occupancy")
            }
            SlotStatus::Reserved => warn!(slot_id, "Reservation replaced a previous reservation"),
            SlotStatus::Empty => {}
        }
        info!(
            slot_id,
            plate = plate.trim(),
            %vehicle_type,
            reserved_for,
            %reserve_time,
            "Slot reserved"
        );
        self.registry.slot(slot_id)
    }

    pub fn mark_arrived(&mut self, slot_id: SlotId) -> DomainResult<&Slot> {
        let now = self.clock.now();
        let slot = self
            .registry
            .mark_arrived(slot_id, now)
            .inspect_err(|e| warn!(slot_id, error = %e, "Arrival rejected"))?;

        info!(slot_id, plate = ?slot.plate(), "Reserved vehicle arrived");
        Ok(slot)
    }

    pub fn checkout(&mut self, slot_id: SlotId) -> DomainResult<Receipt> {
        let now = self.clock.now();
        let receipt = self
            .registry
            .checkout(slot_id, &self.tariff, now)
            .inspect_err(|e| warn!(slot_id, error = %e, "Checkout rejected"))?;

        info!(
            slot_id,
            receipt_id = %receipt.id,
            plate = receipt.plate.as_str(),
            minutes = receipt.minutes,
            is_prebook = receipt.is_prebook,
            fare = %receipt.fare,
            currency = receipt.currency.as_str(),
            "Vehicle checked out"
        );
        Ok(receipt)
    }

    pub fn find_by_plate(&self, query: &str) -> DomainResult<&Slot> {
        self.registry.find_by_plate(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::ManualClock;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
    }

    fn service() -> (ParkingService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(t0()));
        let service = ParkingService::new(8, Tariff::standard(), clock.clone());
        (service, clock)
    }

    #[test]
    fn park_uses_clock_for_start_time() {
        let (mut parking, _clock) = service();
        let slot = parking.park_now(3, " KA01AB1234 ", VehicleType::Car).unwrap();
        assert_eq!(slot.started_at(), Some(t0()));
        assert_eq!(slot.plate(), Some("KA01AB1234"));
    }

    #[test]
    fn checkout_bills_elapsed_clock_time() {
        let (mut parking, clock) = service();
        parking.park_now(3, "KA01AB1234", VehicleType::Car).unwrap();
        clock.advance(Duration::seconds(125));

        let receipt = parking.checkout(3).unwrap();
        assert_eq!(receipt.minutes, 2);
        assert_eq!(receipt.fare, Decimal::from(40));
        assert_eq!(receipt.ended_at, t0() + Duration::seconds(125));
        assert!(parking.slot(3).unwrap().is_empty());
    }

    #[test]
    fn arrival_restarts_the_meter() {
        let (mut parking, clock) = service();
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        parking
            .reserve(5, "KA02XY9999", VehicleType::Bike, "user", at)
            .unwrap();

        // time spent reserved is not billed
        clock.advance(Duration::hours(1));
        parking.mark_arrived(5).unwrap();
        clock.advance(Duration::minutes(10));

        let receipt = parking.checkout(5).unwrap();
        assert_eq!(receipt.minutes, 10);
        assert_eq!(receipt.fare, "115".parse::<Decimal>().unwrap());
    }

    #[test]
    fn errors_pass_through() {
        let (mut parking, _clock) = service();
        assert!(matches!(
            parking.checkout(1),
            Err(DomainError::InvalidState(_))
        ));
        assert!(matches!(
            parking.mark_arrived(42),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn summary_reflects_changes() {
        let (mut parking, _clock) = service();
        parking.park_now(1, "A", VehicleType::Car).unwrap();
        let summary = parking.summary();
        assert_eq!(summary.total, 8);
        assert_eq!(summary.occupied, 1);
        assert_eq!(summary.empty, 7);
    }
}
