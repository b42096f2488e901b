use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{AppState, error::AppError};

/// Logged-in user for page-style views. Anonymous callers are redirected to
/// the login page with `next` pointing back at the request.
pub struct AuthUser(pub i32);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state).await {
            Some(user_id) => Ok(AuthUser(user_id)),
            None => Err(AppError::LoginRequired {
                login_url: state.config.login_url.clone(),
                next: parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| parts.uri.path().to_string()),
            }),
        }
    }
}

/// Logged-in user for the ajax endpoints. Anonymous callers get a 401.
pub struct ApiUser(pub i32);

impl FromRequestParts<AppState> for ApiUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(parts, state)
            .await
            .map(ApiUser)
            .ok_or(AppError::Unauthorized)
    }
}

pub struct OptionalAuthUser(pub Option<i32>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(authenticate(parts, state).await))
    }
}

/// A missing, malformed, or invalid token all mean "anonymous".
async fn authenticate(parts: &mut Parts, state: &AppState) -> Option<i32> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .ok()?;

    match state.auth_service.validate_token(bearer.token()) {
        Ok(user_id) => Some(user_id),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            None
        }
    }
}
