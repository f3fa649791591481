//! Persistence seams.
//!
//! Services talk to storage only through these traits. PostgreSQL is the
//! production backend; the in-memory implementations back the HTTP tests.
//!
//! Every `reads*` method fills in `Pageable::total_count` on success so
//! callers can render pagination headers afterwards.

use async_trait::async_trait;

use quill_core::{AppError, Pageable};
use quill_models::{Comment, NewComment, NewPost, NewUser, Post, User};

pub mod comments;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod posts;
pub mod users;

pub use comments::PgCommentRepository;
pub use posts::PgPostRepository;
pub use users::PgUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `AlreadyTaken` when the username or email is in use.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;
    async fn read(&self, id: u64) -> Result<User, AppError>;
    async fn read_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn reads(&self, pageable: &mut Pageable) -> Result<Vec<User>, AppError>;
    /// Persists username, email, role and status of `user`.
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn delete(&self, id: u64) -> Result<(), AppError>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<Post, AppError>;
    async fn read(&self, id: u64) -> Result<Post, AppError>;
    async fn reads(&self, pageable: &mut Pageable) -> Result<Vec<Post>, AppError>;
    /// Persists title, body and `updated_by` of `post`.
    async fn update(&self, post: &Post) -> Result<Post, AppError>;
    async fn delete(&self, id: u64) -> Result<(), AppError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment, AppError>;
    async fn read(&self, id: u64) -> Result<Comment, AppError>;
    async fn reads_by_post(
        &self,
        post_id: u64,
        pageable: &mut Pageable,
    ) -> Result<Vec<Comment>, AppError>;
    async fn delete(&self, id: u64) -> Result<(), AppError>;
}

/// Identifiers are `BIGSERIAL` in the database. Anything above `i64::MAX`
/// cannot exist, so it is clamped and simply matches no row.
pub(crate) fn db_id(id: u64) -> i64 {
    i64::try_from(id).unwrap_or(i64::MAX)
}
