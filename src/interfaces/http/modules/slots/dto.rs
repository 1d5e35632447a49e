//! Slot DTOs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{Slot, SlotId, SlotStatus, VehicleType};

/// Slot details in API responses
#[derive(Debug, Serialize)]
pub struct SlotDto {
    pub id: SlotId,
    pub status: SlotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserve_time: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub is_prebook: bool,
}

impl From<&Slot> for SlotDto {
    fn from(slot: &Slot) -> Self {
        Self {
            id: slot.id(),
            status: slot.status(),
            plate: slot.plate().map(str::to_string),
            vehicle_type: slot.vehicle_type(),
            reserved_for: slot.reserved_for().map(str::to_string),
            reserve_time: slot.reserve_time(),
            started_at: slot.started_at(),
            is_prebook: slot.is_prebook(),
        }
    }
}

/// Walk-in parking request
#[derive(Debug, Deserialize, Validate)]
pub struct ParkRequest {
    #[validate(length(min = 1, max = 16, message = "plate must be 1-16 characters"))]
    pub plate: String,
    /// `car`, `bike` or `heavy`
    pub vehicle_type: String,
}

/// Pre-booking request; the slot is held for the authenticated user.
#[derive(Debug, Deserialize, Validate)]
pub struct ReserveRequest {
    #[validate(length(min = 1, max = 16, message = "plate must be 1-16 characters"))]
    pub plate: String,
    pub vehicle_type: String,
    /// Expected arrival, e.g. `2026-10-20T14:30:00`
    pub reserve_time: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub plate: String,
}
