use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use crate::error::AppError;
use crate::identity::IdentityError;
use crate::state::AppState;

/// Authenticated caller extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. Resolution goes
/// through the identity provider injected into `AppState`.
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let identity = state.identity.resolve(token).await.map_err(|e| match e {
            IdentityError::InvalidToken => AppError::TokenInvalid,
            IdentityError::Unavailable(detail) => AppError::Internal(detail),
        })?;

        Ok(AuthUser {
            user_id: identity.user_id,
            username: identity.username,
        })
    }
}
