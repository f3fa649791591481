//! Administrative commands behind the `quill-cli` binary.

pub mod seeder;

use sqlx::PgPool;

use quill_auth::{Role, Status};
use quill_core::hash_password;
use quill_models::{NewUser, User};

use crate::repository::{PgUserRepository, UserRepository};

/// Creates an active account with any role, including `admin`, which the
/// HTTP surface cannot grant at creation time.
pub async fn create_user(
    db: &PgPool,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<User> {
    let password_hash = hash_password(password).map_err(|e| e.error)?;

    PgUserRepository::new(db.clone())
        .create(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            status: Status::Active,
        })
        .await
        .map_err(|e| e.error)
}
