//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::error;

use super::dto::{LoginRequest, LoginResponse, UserInfo};
use crate::infrastructure::crypto::jwt::create_token;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

/// `POST /api/v1/auth/login`
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user = state
        .identity
        .authenticate(&request.username, &request.password)
        .map_err(domain_error)?;

    let token = create_token(&user, &state.jwt_config).map_err(|e| {
        error!(error = %e, "Failed to sign token");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to issue token")),
        )
    })?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: UserInfo {
            username: user.username,
            role: user.role,
        },
    })))
}

/// `GET /api/v1/auth/me`
pub async fn me(Extension(user): Extension<AuthenticatedUser>) -> Json<ApiResponse<UserInfo>> {
    Json(ApiResponse::success(UserInfo {
        username: user.username,
        role: user.role,
    }))
}
