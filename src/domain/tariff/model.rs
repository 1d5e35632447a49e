//! Tariff domain entity and parking receipts

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::slot::{SlotId, VehicleType};
use crate::shared::errors::{DomainError, DomainResult};

/// Per-minute rates and the pre-booking surcharge.
#[derive(Debug, Clone, PartialEq)]
pub struct Tariff {
    rates: BTreeMap<VehicleType, Decimal>,
    /// Fraction added on top of the base fare, e.g. `0.15`
    prebook_surcharge: Decimal,
    /// Currency code shown on receipts
    currency: String,
}

impl Tariff {
    pub fn new(
        rates: BTreeMap<VehicleType, Decimal>,
        prebook_surcharge_percent: u32,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            rates,
            prebook_surcharge: Decimal::new(i64::from(prebook_surcharge_percent), 2),
            currency: currency.into(),
        }
    }

    /// car 20, bike 10, heavy 30 per minute; 15% pre-booking surcharge.
    pub fn standard() -> Self {
        let rates = BTreeMap::from([
            (VehicleType::Car, Decimal::from(20)),
            (VehicleType::Bike, Decimal::from(10)),
            (VehicleType::Heavy, Decimal::from(30)),
        ]);
        Self::new(rates, 15, "INR")
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn prebook_surcharge(&self) -> Decimal {
        self.prebook_surcharge
    }

    pub fn rates(&self) -> &BTreeMap<VehicleType, Decimal> {
        &self.rates
    }

    /// Per-minute rate. A type without a configured rate is an error,
    /// never a fallback to some default rate.
    pub fn rate_for(&self, vehicle_type: VehicleType) -> DomainResult<Decimal> {
        self.rates
            .get(&vehicle_type)
            .copied()
            .ok_or_else(|| DomainError::InvalidVehicleType(vehicle_type.to_string()))
    }

    /// `rate * minutes`, times `1 + surcharge` when pre-booked,
    /// rounded to 2 decimal places.
    pub fn calculate_fare(
        &self,
        vehicle_type: VehicleType,
        minutes: u64,
        is_prebook: bool,
    ) -> DomainResult<Decimal> {
        Ok(self
            .calculate_fare_breakdown(vehicle_type, minutes, is_prebook)?
            .total)
    }

    pub fn calculate_fare_breakdown(
        &self,
        vehicle_type: VehicleType,
        minutes: u64,
        is_prebook: bool,
    ) -> DomainResult<FareBreakdown> {
        let rate = self.rate_for(vehicle_type)?;
        let base = rate * Decimal::from(minutes);

        let total = if is_prebook {
            (base * (Decimal::ONE + self.prebook_surcharge)).round_dp(2)
        } else {
            base.round_dp(2)
        };

        Ok(FareBreakdown {
            rate,
            minutes,
            base,
            surcharge: total - base,
            total,
            currency: self.currency.clone(),
        })
    }

    /// Format an amount as human-readable string, e.g. `"115.00 INR"`
    pub fn format_fare(&self, amount: Decimal) -> String {
        format!("{:.2} {}", amount, self.currency)
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self::standard()
    }
}

/// Fare breakdown for one checkout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareBreakdown {
    pub rate: Decimal,
    pub minutes: u64,
    pub base: Decimal,
    pub surcharge: Decimal,
    pub total: Decimal,
    pub currency: String,
}

/// Whole minutes between start and end, floored, never less than one.
pub fn elapsed_minutes(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> u64 {
    let seconds = (ended_at - started_at).num_seconds();
    (seconds / 60).max(1) as u64
}

/// Receipt returned by a checkout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub id: Uuid,
    pub slot_id: SlotId,
    pub plate: String,
    pub vehicle_type: VehicleType,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub minutes: u64,
    pub is_prebook: bool,
    pub base_fare: Decimal,
    pub surcharge: Decimal,
    pub fare: Decimal,
    pub currency: String,
}

impl Receipt {
    pub fn format_fare(&self) -> String {
        format!("{:.2} {}", self.fare, self.currency)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn plain_fare_is_rate_times_minutes() {
        let t = Tariff::standard();
        for (vt, rate) in [
            (VehicleType::Car, 20),
            (VehicleType::Bike, 10),
            (VehicleType::Heavy, 30),
        ] {
            for minutes in [1u64, 2, 7, 60, 1440] {
                assert_eq!(
                    t.calculate_fare(vt, minutes, false).unwrap(),
                    Decimal::from(rate * minutes)
                );
            }
        }
    }

    #[test]
    fn prebook_fare_adds_fifteen_percent() {
        let t = Tariff::standard();
        // 10 min bike: 100 * 1.15
        assert_eq!(
            t.calculate_fare(VehicleType::Bike, 10, true).unwrap(),
            dec("115.00")
        );
        // 1 min car: 20 * 1.15
        assert_eq!(t.calculate_fare(VehicleType::Car, 1, true).unwrap(), dec("23"));
        // 3 min heavy: 90 * 1.15
        assert_eq!(
            t.calculate_fare(VehicleType::Heavy, 3, true).unwrap(),
            dec("103.5")
        );
    }

    #[test]
    fn fractional_rates_round_to_two_places() {
        let rates = BTreeMap::from([(VehicleType::Car, dec("0.333"))]);
        let t = Tariff::new(rates, 15, "INR");
        // 0.333 * 1 * 1.15 = 0.38295
        assert_eq!(t.calculate_fare(VehicleType::Car, 1, true).unwrap(), dec("0.38"));
        assert_eq!(t.calculate_fare(VehicleType::Car, 1, false).unwrap(), dec("0.33"));
    }

    #[test]
    fn missing_rate_is_invalid_vehicle_type() {
        let rates = BTreeMap::from([(VehicleType::Car, Decimal::from(20))]);
        let t = Tariff::new(rates, 15, "INR");
        let err = t.calculate_fare(VehicleType::Heavy, 5, false).unwrap_err();
        assert_eq!(err, DomainError::InvalidVehicleType("heavy".into()));
    }

    #[test]
    fn breakdown_splits_surcharge() {
        let t = Tariff::standard();
        let bd = t
            .calculate_fare_breakdown(VehicleType::Bike, 10, true)
            .unwrap();
        assert_eq!(bd.rate, Decimal::from(10));
        assert_eq!(bd.base, Decimal::from(100));
        assert_eq!(bd.surcharge, dec("15"));
        assert_eq!(bd.total, dec("115"));
        assert_eq!(bd.currency, "INR");

        let bd = t
            .calculate_fare_breakdown(VehicleType::Car, 2, false)
            .unwrap();
        assert_eq!(bd.surcharge, Decimal::ZERO);
        assert_eq!(bd.total, Decimal::from(40));
    }

    #[test]
    fn format_fare_helper() {
        let t = Tariff::standard();
        assert_eq!(t.format_fare(dec("115")), "115.00 INR");
        assert_eq!(t.format_fare(dec("103.5")), "103.50 INR");
    }

    #[test]
    fn elapsed_minutes_floors() {
        let start = Utc::now();
        assert_eq!(elapsed_minutes(start, start + Duration::seconds(125)), 2);
        assert_eq!(elapsed_minutes(start, start + Duration::seconds(179)), 2);
        assert_eq!(elapsed_minutes(start, start + Duration::minutes(10)), 10);
    }

    #[test]
    fn elapsed_minutes_has_one_minute_minimum() {
        let start = Utc::now();
        assert_eq!(elapsed_minutes(start, start), 1);
        assert_eq!(elapsed_minutes(start, start + Duration::seconds(59)), 1);
        // clock went backwards
        assert_eq!(elapsed_minutes(start, start - Duration::seconds(30)), 1);
    }
}
