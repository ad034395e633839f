//! Request extractors for the two access guards, plus body/query helpers
//! that turn axum rejections into structured [`RelayError`] responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::auth::{Claims, DEVICE_KEY_HEADER};
use crate::error::RelayError;

/// The raw device credential from the `x-api-key` header, if any.
///
/// Checking it is the relay service's job; this extractor never rejects.
#[derive(Debug, Clone)]
pub struct DeviceKey(pub Option<String>);

impl<S> FromRequestParts<S> for DeviceKey
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(DEVICE_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Ok(Self(key))
    }
}

/// A verified operator session. Always requires a bearer token.
#[derive(Debug, Clone)]
pub struct Operator(pub Claims);

impl FromRequestParts<AppState> for Operator {
    type Rejection = RelayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| RelayError::Unauthorized("missing bearer token".to_string()))?;
        state.auth_service.authenticate(token).map(Self)
    }
}

/// Operator check that only applies when `AUTH_MODE=full`.
///
/// Yields `None` in the other modes; in `full` mode behaves like
/// [`Operator`].
#[derive(Debug, Clone)]
pub struct OperatorGate(pub Option<Claims>);

impl FromRequestParts<AppState> for OperatorGate {
    type Rejection = RelayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.config.auth_mode.guards_operator() {
            return Ok(Self(None));
        }
        let Operator(claims) = Operator::from_request_parts(parts, state).await?;
        Ok(Self(Some(claims)))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Unwraps a JSON body, mapping malformed input to a validation error.
///
/// # Errors
///
/// Returns [`RelayError::Validation`] with axum's rejection text.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, RelayError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| RelayError::Validation(rejection.body_text()))
}

/// Unwraps query parameters, mapping bad input to a validation error.
///
/// # Errors
///
/// Returns [`RelayError::Validation`] with axum's rejection text.
pub fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, RelayError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| RelayError::Validation(rejection.body_text()))
}
