use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::application::{IdentityService, ParkingService};
use crate::infrastructure::crypto::jwt::JwtConfig;

/// Shared state for every REST handler.
///
/// The registry sits behind one async mutex; a handler holds it for the
/// whole operation so concurrent requests never interleave on a slot.
#[derive(Clone)]
pub struct AppState {
    pub parking: Arc<Mutex<ParkingService>>,
    pub identity: Arc<IdentityService>,
    pub jwt_config: JwtConfig,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(parking: ParkingService, identity: Arc<IdentityService>, jwt_config: JwtConfig) -> Self {
        Self {
            parking: Arc::new(Mutex::new(parking)),
            identity,
            jwt_config,
            started_at: Instant::now(),
        }
    }
}
