//! Text rendering of slots, receipts and feedback

use std::fmt::Write;

use crate::application::Feedback;
use crate::domain::{DomainError, Receipt, Slot, SlotState, SlotSummary};

const BOARD_COLUMNS: usize = 4;

pub fn slot_line(slot: &Slot) -> String {
    match &slot.state {
        SlotState::Empty => format!("🟩 Slot {} - Empty", slot.id()),
        SlotState::Reserved { reserved_for, .. } => {
            format!("🟨 Slot {} - Reserved ({})", slot.id(), reserved_for)
        }
        SlotState::Occupied { vehicle, .. } => format!(
            "🟥 Slot {} - {} ({})",
            slot.id(),
            vehicle.plate,
            vehicle.vehicle_type
        ),
    }
}

/// Detailed view of the selected slot
pub fn slot_details(slot: &Slot) -> String {
    let mut out = format!("Selected: {}", slot_line(slot));
    match &slot.state {
        SlotState::Empty => {}
        SlotState::Reserved {
            vehicle,
            reserve_time,
            ..
        } => {
            let _ = write!(
                out,
                "\n  Vehicle: {} ({})\n  Expected: {}",
                vehicle.plate,
                vehicle.vehicle_type,
                reserve_time.format("%Y-%m-%d %H:%M")
            );
        }
        SlotState::Occupied {
            started_at,
            is_prebook,
            ..
        } => {
            let _ = write!(
                out,
                "\n  Since: {}\n  Pre-booked: {}",
                started_at.format("%Y-%m-%d %H:%M:%S UTC"),
                yes_no(*is_prebook)
            );
        }
    }
    out
}

/// Slots laid out in rows of four, followed by the status counts
pub fn board(slots: &[Slot], summary: &SlotSummary) -> String {
    let lines: Vec<String> = slots.iter().map(slot_line).collect();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for row in lines.chunks(BOARD_COLUMNS) {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| {
                let pad = width - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    let _ = write!(
        out,
        "{} slots: {} empty, {} reserved, {} occupied",
        summary.total, summary.empty, summary.reserved, summary.occupied
    );
    out
}

pub fn receipt(receipt: &Receipt) -> String {
    let mut out = String::from("Receipt\n");
    let _ = writeln!(out, "  Slot:        {}", receipt.slot_id);
    let _ = writeln!(
        out,
        "  Vehicle:     {} ({})",
        receipt.plate, receipt.vehicle_type
    );
    let _ = writeln!(out, "  Duration:    {} min", receipt.minutes);
    let _ = writeln!(out, "  Pre-booked:  {}", yes_no(receipt.is_prebook));
    if receipt.is_prebook {
        let _ = writeln!(
            out,
            "  Base fare:   {:.2} {}",
            receipt.base_fare, receipt.currency
        );
        let _ = writeln!(
            out,
            "  Surcharge:   {:.2} {}",
            receipt.surcharge, receipt.currency
        );
    }
    let _ = write!(out, "  Total fare:  {}", receipt.format_fare());
    out
}

/// Message shown to the operator for an error
pub fn error_message(error: &DomainError) -> String {
    match error {
        DomainError::NotFound {
            entity: "Vehicle", ..
        } => "Not found".to_string(),
        DomainError::NotFound {
            entity,
            field,
            value,
        } => format!("{} with {} {} does not exist", entity, field, value),
        DomainError::Unauthorized(msg)
        | DomainError::Conflict(msg)
        | DomainError::Validation(msg)
        | DomainError::InvalidState(msg) => msg.clone(),
        DomainError::InvalidVehicleType(vt) => {
            format!("Unknown vehicle type '{}', use car, bike or heavy", vt)
        }
    }
}

pub fn feedback(feedback: &Feedback) -> String {
    match feedback {
        Feedback::Success {
            message,
            receipt: None,
        } => format!("✅ {}", message),
        Feedback::Success {
            message,
            receipt: Some(r),
        } => format!("✅ {}\n{}", message, receipt(r)),
        Feedback::Error(e) => format!("❌ {}", error_message(e)),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}
