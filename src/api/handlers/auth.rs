//! Operator session handlers, mounted only in `full` auth mode.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{LoginRequest, LoginResponse};
use crate::api::extract::{Operator, json_body};
use crate::app_state::AppState;
use crate::auth::UserSummary;
use crate::error::{ErrorResponse, RelayError};

/// `POST /login` — Exchange credentials for a session token.
///
/// # Errors
///
/// Returns [`RelayError::Unauthorized`] on bad credentials.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    summary = "Operator login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RelayError> {
    let request = json_body(payload)?;
    let grant = state
        .auth_service
        .login(&request.username, &request.password)?;
    Ok(Json(LoginResponse {
        token: grant.token,
        username: grant.username,
        role: grant.role,
    }))
}

/// `GET /admin/users` — List operator accounts (admin only).
///
/// # Errors
///
/// Returns [`RelayError::Unauthorized`] without a valid session and
/// [`RelayError::Forbidden`] for non-admin sessions.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Auth",
    summary = "List operators",
    responses(
        (status = 200, description = "Usernames and roles", body = Vec<UserSummary>),
        (status = 401, description = "Session required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Operator(claims): Operator,
) -> Result<impl IntoResponse, RelayError> {
    Ok(Json(state.auth_service.list_users(&claims)?))
}

/// Login and admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/admin/users", get(list_users))
}
