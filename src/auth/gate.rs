use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::token::JwtKeys,
    error::ApiError,
    state::AppState,
    users::repo::{self, UserStatus},
};

/// Authenticated caller, extracted on every protected route.
///
/// Carries the decoded token claims after the account's live status has
/// been re-checked against the store: a token stays structurally valid
/// after its owner is blocked, so the row is the authority, not the token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::MissingCredential)?;
    auth.strip_prefix("Bearer ").ok_or(ApiError::MissingCredential)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            ApiError::from(e)
        })?;

        let user = repo::find_by_id(&state.db, claims.sub)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::UnknownUser)?;

        if user.status == UserStatus::Blocked {
            warn!(user_id = %user.id, "blocked account rejected");
            return Err(ApiError::Blocked);
        }

        Ok(AuthUser {
            user_id: claims.sub,
            name: claims.name,
        })
    }
}
