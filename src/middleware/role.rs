//! Minimum-role extractors.
//!
//! Each extractor authenticates the caller through [`AuthUser`] and then
//! requires a role score at least as high as its own. Any shortfall is a
//! plain `un/unauthorized`.
//!
//! ```ignore
//! async fn delete_post(
//!     State(state): State<AppState>,
//!     RequireAdmin(_admin): RequireAdmin,
//!     PathId(id): PathId,
//! ) -> Result<Json<IdResponse>, AppError> { ... }
//! ```

use axum::extract::FromRequestParts;
use quill_auth::Role;

use crate::middleware::auth::AuthUser;

macro_rules! require_role {
    ($name:ident, $role:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = quill_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = AuthUser::from_request_parts(parts, state).await?;
                quill_auth::rbac::authorize_minimum_role(Some(auth_user.0.role), $role)?;
                Ok($name(auth_user))
            }
        }
    };
}

require_role!(RequireRegistered, Role::Registered);
require_role!(RequireMod, Role::Mod);
require_role!(RequireAdmin, Role::Admin);
