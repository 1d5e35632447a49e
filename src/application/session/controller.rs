//! Session controller — one interactive operator session.
//!
//! Holds who is logged in and which slot is selected, and routes each
//! user action to the [`ParkingService`]. [`SessionController::dispatch`]
//! turns every outcome, error or not, into [`Feedback`] for display;
//! nothing an operator types can bring the session down.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::application::identity::IdentityService;
use crate::application::parking::ParkingService;
use crate::domain::{
    DomainError, DomainResult, Receipt, Slot, SlotId, SlotSummary, User, VehicleType,
};

/// A user-initiated action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Login { username: String, password: String },
    Logout,
    Select(SlotId),
    ParkNow { plate: String, vehicle_type: VehicleType },
    Reserve {
        plate: String,
        vehicle_type: VehicleType,
        reserve_time: NaiveDateTime,
    },
    Arrived,
    Checkout,
    Find(String),
}

/// Result of an action, ready to show to the operator
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Success {
        message: String,
        receipt: Option<Receipt>,
    },
    Error(DomainError),
}

impl Feedback {
    fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
            receipt: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

pub struct SessionController {
    parking: ParkingService,
    identity: Arc<IdentityService>,
    current_user: Option<User>,
    selected: Option<SlotId>,
}

impl SessionController {
    pub fn new(parking: ParkingService, identity: Arc<IdentityService>) -> Self {
        Self {
            parking,
            identity,
            current_user: None,
            selected: None,
        }
    }

    pub fn parking(&self) -> &ParkingService {
        &self.parking
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn selected(&self) -> Option<SlotId> {
        self.selected
    }

    pub fn selected_slot(&self) -> Option<&Slot> {
        self.selected.and_then(|id| self.parking.slot(id).ok())
    }

    // ── Authentication ──────────────────────────────────────────

    /// On failure the current session is left as it was. Switching to a
    /// different user drops the previous user's selection.
    pub fn login(&mut self, username: &str, password: &str) -> DomainResult<&User> {
        let user = self.identity.authenticate(username, password)?;
        let same_user = self
            .current_user
            .as_ref()
            .is_some_and(|current| current.username == user.username);
        if !same_user && self.selected.take().is_some() {
            debug!(username = user.username.as_str(), "Selection cleared on user switch");
        }
        Ok(&*self.current_user.insert(user))
    }

    /// Clear identity and selection; returns who was logged in.
    pub fn logout(&mut self) -> Option<User> {
        self.selected = None;
        let user = self.current_user.take();
        if let Some(user) = &user {
            info!(username = user.username.as_str(), "User logged out");
        }
        user
    }

    fn require_user(&self) -> DomainResult<&User> {
        self.current_user
            .as_ref()
            .ok_or_else(|| DomainError::Unauthorized("Please log in first".into()))
    }

    fn require_selection(&self) -> DomainResult<SlotId> {
        self.require_user()?;
        self.selected
            .ok_or_else(|| DomainError::Validation("Select a slot first".into()))
    }

    // ── Slot actions ────────────────────────────────────────────

    /// All slots with their counts, for a logged-in user only.
    pub fn board(&self) -> DomainResult<(&[Slot], SlotSummary)> {
        self.require_user()?;
        Ok((self.parking.slots(), self.parking.summary()))
    }

    pub fn select(&mut self, slot_id: SlotId) -> DomainResult<&Slot> {
        self.require_user()?;
        let slot = self.parking.slot(slot_id)?;
        self.selected = Some(slot_id);
        debug!(slot_id, "Slot selected");
        Ok(slot)
    }

    pub fn park_now(&mut self, plate: &str, vehicle_type: VehicleType) -> DomainResult<&Slot> {
        let slot_id = self.require_selection()?;
        self.parking.park_now(slot_id, plate, vehicle_type)
    }

    /// Reserve the selected slot for the logged-in user.
    pub fn reserve(
        &mut self,
        plate: &str,
        vehicle_type: VehicleType,
        reserve_time: NaiveDateTime,
    ) -> DomainResult<&Slot> {
        let slot_id = self.require_selection()?;
        let reserved_for = self.require_user()?.username.clone();
        self.parking
            .reserve(slot_id, plate, vehicle_type, &reserved_for, reserve_time)
    }

    pub fn mark_arrived(&mut self) -> DomainResult<&Slot> {
        let slot_id = self.require_selection()?;
        self.parking.mark_arrived(slot_id)
    }

    pub fn checkout(&mut self) -> DomainResult<Receipt> {
        let slot_id = self.require_selection()?;
        self.parking.checkout(slot_id)
    }

    /// Look a plate up and select the slot holding it.
    pub fn find(&mut self, query: &str) -> DomainResult<SlotId> {
        self.require_user()?;
        let slot_id = self.parking.find_by_plate(query)?.id();
        self.selected = Some(slot_id);
        Ok(slot_id)
    }

    // ── Dispatch ────────────────────────────────────────────────

    pub fn dispatch(&mut self, action: Action) -> Feedback {
        let result = match action {
            Action::Login { username, password } => self
                .login(&username, &password)
                .map(|user| Feedback::success(format!("Logged in as {}", user.username))),
            Action::Logout => Ok(match self.logout() {
                Some(user) => Feedback::success(format!("Logged out {}", user.username)),
                None => Feedback::success("Not logged in"),
            }),
            Action::Select(slot_id) => self
                .select(slot_id)
                .map(|slot| Feedback::success(format!("Selected slot {}", slot.id()))),
            Action::ParkNow {
                plate,
                vehicle_type,
            } => self
                .park_now(&plate, vehicle_type)
                .map(|slot| Feedback::success(format!("Vehicle parked in slot {}", slot.id()))),
            Action::Reserve {
                plate,
                vehicle_type,
                reserve_time,
            } => self
                .reserve(&plate, vehicle_type, reserve_time)
                .map(|slot| Feedback::success(format!("Slot {} reserved", slot.id()))),
            Action::Arrived => self.mark_arrived().map(|slot| {
                Feedback::success(format!("Parking started in slot {}", slot.id()))
            }),
            Action::Checkout => self.checkout().map(|receipt| Feedback::Success {
                message: format!("Slot {} checked out", receipt.slot_id),
                receipt: Some(receipt),
            }),
            Action::Find(query) => self
                .find(&query)
                .map(|slot_id| Feedback::success(format!("Vehicle found in slot {}", slot_id))),
        };

        result.unwrap_or_else(|e| {
            debug!(kind = e.kind(), error = %e, "Action failed");
            Feedback::Error(e)
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────
