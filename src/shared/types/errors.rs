use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid vehicle type: {0}")]
    InvalidVehicleType(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl DomainError {
    pub fn slot_not_found(slot_id: u32) -> Self {
        Self::NotFound {
            entity: "Slot",
            field: "id",
            value: slot_id.to_string(),
        }
    }

    /// Short machine-readable kind, used in API payloads and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidVehicleType(_) => "invalid_vehicle_type",
            Self::InvalidState(_) => "invalid_state",
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_slot() {
        let err = DomainError::slot_not_found(9);
        assert_eq!(err.to_string(), "Not found: Slot with id=9");
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn invalid_vehicle_type_message() {
        let err = DomainError::InvalidVehicleType("truck".into());
        assert_eq!(err.to_string(), "Invalid vehicle type: truck");
    }
}
