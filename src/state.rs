use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use quill_config::{CorsConfig, DatabaseConfig, JwtConfig};

use crate::repository::{
    CommentRepository, PgCommentRepository, PgPostRepository, PgUserRepository, PostRepository,
    UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn postgres(db: PgPool, jwt_config: JwtConfig, cors_config: CorsConfig) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            posts: Arc::new(PgPostRepository::new(db.clone())),
            comments: Arc::new(PgCommentRepository::new(db)),
            jwt_config,
            cors_config,
        }
    }

    /// State backed by in-memory repositories, for tests.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory(jwt_config: JwtConfig, cors_config: CorsConfig) -> Self {
        use crate::repository::memory::{
            MemoryCommentRepository, MemoryPostRepository, MemoryUserRepository,
        };

        Self {
            users: Arc::new(MemoryUserRepository::default()),
            posts: Arc::new(MemoryPostRepository::default()),
            comments: Arc::new(MemoryCommentRepository::default()),
            jwt_config,
            cors_config,
        }
    }
}

/// Connects to PostgreSQL, applies pending migrations, and loads the
/// remaining configuration from the environment.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db_config = DatabaseConfig::from_env()?;
    let db = quill_db::init_db_pool(&db_config)
        .await
        .context("Failed to connect to database")?;
    quill_db::run_migrations(&db)
        .await
        .context("Failed to run database migrations")?;

    Ok(AppState::postgres(
        db,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
