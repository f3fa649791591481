use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use quill_core::{AppError, Entity, Pageable, fetch_page};
use quill_models::{NewPost, Post};

use super::{PostRepository, db_id};

const POST_COLUMNS: &str = "id, title, body, created_by, updated_by, created_at, updated_at";

const SORT_COLUMNS: &[&str] = &[
    "id",
    "title",
    "created_by",
    "updated_by",
    "created_at",
    "updated_at",
];

#[derive(Clone)]
pub struct PgPostRepository {
    db: PgPool,
}

impl PgPostRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self, post), fields(author = %post.author))]
    async fn create(&self, post: NewPost) -> Result<Post, AppError> {
        let sql = format!(
            "INSERT INTO posts (title, body, created_by, updated_by)
             VALUES ($1, $2, $3, $3)
             RETURNING {POST_COLUMNS}"
        );

        sqlx::query_as::<_, Post>(&sql)
            .bind(&post.title)
            .bind(&post.body)
            .bind(&post.author)
            .fetch_one(&self.db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(self))]
    async fn read(&self, id: u64) -> Result<Post, AppError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");

        sqlx::query_as::<_, Post>(&sql)
            .bind(db_id(id))
            .fetch_optional(&self.db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(Entity::Post))
    }

    #[instrument(skip(self))]
    async fn reads(&self, pageable: &mut Pageable) -> Result<Vec<Post>, AppError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY {} LIMIT $1 OFFSET $2",
            pageable.order_by(SORT_COLUMNS)
        );
        let (limit, offset) = (pageable.limit(), pageable.offset());

        let count = async {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
                .fetch_one(&self.db)
                .await
                .map_err(AppError::database)
        };
        let fetch = async {
            sqlx::query_as::<_, Post>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.db)
                .await
                .map_err(AppError::database)
        };

        fetch_page(pageable, count, fetch).await
    }

    #[instrument(skip(self, post), fields(post_id = post.id))]
    async fn update(&self, post: &Post) -> Result<Post, AppError> {
        let sql = format!(
            "UPDATE posts
             SET title = $1, body = $2, updated_by = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING {POST_COLUMNS}"
        );

        sqlx::query_as::<_, Post>(&sql)
            .bind(&post.title)
            .bind(&post.body)
            .bind(&post.updated_by)
            .bind(db_id(post.id))
            .fetch_optional(&self.db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(Entity::Post))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: u64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(db_id(id))
            .execute(&self.db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(Entity::Post));
        }

        Ok(())
    }
}
