use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::warn;

use quill_auth::{Claims, Status, verify_token};
use quill_core::AppError;

use crate::state::AppState;

/// Extractor that runs the authentication gate and yields the caller's claims.
///
/// The gate checks, in order:
///
/// 1. an `Authorization` header is present (`auth/missing-header`)
/// 2. it carries a `Bearer` token that verifies (`auth/invalid-token`,
///    `auth/expired-token`)
/// 3. the user still exists, still holds the role named in the token and
///    is active (`un/invalid-request` otherwise)
///
/// The result is cached in request extensions, so several extractors on
/// one handler trigger a single lookup.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    pub fn user_id(&self) -> u64 {
        self.0.uid
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(auth_user.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(AppError::missing_credential)?
            .to_str()
            .map_err(|_| AppError::invalid_credential())?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(AppError::invalid_credential)?;

        let claims = verify_token(token, &state.jwt_config)?;

        let user = state.users.read(claims.uid).await.map_err(|err| {
            if err.is_not_found() {
                warn!(user_id = claims.uid, "Token subject no longer exists");
                AppError::invalid_request()
            } else {
                err
            }
        })?;

        if user.role != claims.role {
            warn!(
                user_id = user.id,
                token_role = %claims.role,
                current_role = %user.role,
                "Token role is stale"
            );
            return Err(AppError::invalid_request());
        }

        if user.status == Status::Passive {
            warn!(user_id = user.id, "Passive user presented a token");
            return Err(AppError::invalid_request());
        }

        let auth_user = AuthUser(claims);
        parts.extensions.insert(auth_user.clone());
        Ok(auth_user)
    }
}
