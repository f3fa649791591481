//! Authorization predicates.
//!
//! All functions are pure. Every denial is the same
//! [`ErrorKind::Unauthorized`](quill_core::ErrorKind::Unauthorized), whatever
//! the reason, so callers cannot tell a missing identity from a low role.

use quill_core::AppError;

use crate::claims::Claims;
use crate::roles::Role;

/// `score(actor) >= score(required)`.
pub fn has_minimum_role(actor: Role, required: Role) -> bool {
    actor.score() >= required.score()
}

/// True only when claims are present and belong to `target_user_id`.
pub fn is_self(claims: Option<&Claims>, target_user_id: u64) -> bool {
    claims.is_some_and(|claims| claims.uid == target_user_id)
}

pub fn authorize_minimum_role(role: Option<Role>, required: Role) -> Result<(), AppError> {
    match role {
        Some(role) if has_minimum_role(role, required) => Ok(()),
        _ => Err(AppError::unauthorized()),
    }
}

/// Passes when the caller owns the resource or holds at least `required`.
pub fn authorize_self_or_role(
    claims: Option<&Claims>,
    target_user_id: u64,
    required: Role,
) -> Result<Claims, AppError> {
    match claims {
        Some(c) if is_self(claims, target_user_id) || has_minimum_role(c.role, required) => {
            Ok(c.clone())
        }
        _ => Err(AppError::unauthorized()),
    }
}
