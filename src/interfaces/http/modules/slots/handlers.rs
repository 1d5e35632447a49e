//! Slot API handlers
//!
//! Every handler locks the parking service for the whole operation.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use tracing::info;

use super::dto::{ParkRequest, ReserveRequest, SearchQuery, SlotDto};
use crate::domain::{Receipt, SlotId, SlotSummary, VehicleType};
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

/// `GET /api/v1/slots`
pub async fn list_slots(State(state): State<AppState>) -> Json<ApiResponse<Vec<SlotDto>>> {
    let parking = state.parking.lock().await;
    let slots = parking.slots().iter().map(SlotDto::from).collect();
    Json(ApiResponse::success(slots))
}

/// `GET /api/v1/slots/summary`
pub async fn summary(State(state): State<AppState>) -> Json<ApiResponse<SlotSummary>> {
    let parking = state.parking.lock().await;
    Json(ApiResponse::success(parking.summary()))
}

/// `GET /api/v1/slots/{id}`
pub async fn get_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<SlotId>,
) -> ApiResult<SlotDto> {
    let parking = state.parking.lock().await;
    let slot = parking.slot(slot_id).map_err(domain_error)?;
    Ok(Json(ApiResponse::success(SlotDto::from(slot))))
}

/// `GET /api/v1/slots/search?plate=`
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<SlotDto> {
    let parking = state.parking.lock().await;
    let slot = parking.find_by_plate(&query.plate).map_err(domain_error)?;
    Ok(Json(ApiResponse::success(SlotDto::from(slot))))
}

/// `POST /api/v1/slots/{id}/park`
pub async fn park(
    State(state): State<AppState>,
    Path(slot_id): Path<SlotId>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ParkRequest>,
) -> ApiResult<SlotDto> {
    let vehicle_type: VehicleType = request.vehicle_type.parse().map_err(domain_error)?;

    let mut parking = state.parking.lock().await;
    let slot = parking
        .park_now(slot_id, &request.plate, vehicle_type)
        .map_err(domain_error)?;
    info!(slot_id, by = user.username.as_str(), "Park via API");
    Ok(Json(ApiResponse::success(SlotDto::from(slot))))
}

/// `POST /api/v1/slots/{id}/reserve`
pub async fn reserve(
    State(state): State<AppState>,
    Path(slot_id): Path<SlotId>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ReserveRequest>,
) -> ApiResult<SlotDto> {
    let vehicle_type: VehicleType = request.vehicle_type.parse().map_err(domain_error)?;

    let mut parking = state.parking.lock().await;
    let slot = parking
        .reserve(
            slot_id,
            &request.plate,
            vehicle_type,
            &user.username,
            request.reserve_time,
        )
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(SlotDto::from(slot))))
}

/// `POST /api/v1/slots/{id}/arrive`
pub async fn arrive(
    State(state): State<AppState>,
    Path(slot_id): Path<SlotId>,
) -> ApiResult<SlotDto> {
    let mut parking = state.parking.lock().await;
    let slot = parking.mark_arrived(slot_id).map_err(domain_error)?;
    Ok(Json(ApiResponse::success(SlotDto::from(slot))))
}

/// `POST /api/v1/slots/{id}/checkout`
pub async fn checkout(
    State(state): State<AppState>,
    Path(slot_id): Path<SlotId>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Receipt> {
    let receipt = state
        .parking
        .lock()
        .await
        .checkout(slot_id)
        .map_err(domain_error)?;
    info!(slot_id, by = user.username.as_str(), "Checkout via API");
    Ok(Json(ApiResponse::success(receipt)))
}
