use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use quill_core::{AppError, Entity, Pageable, fetch_page};
use quill_models::{Comment, NewComment};

use super::{CommentRepository, db_id};

const COMMENT_COLUMNS: &str = "id, post_id, user_id, author, text, created_at, updated_at";

const SORT_COLUMNS: &[&str] = &["id", "author", "created_at", "updated_at"];

#[derive(Clone)]
pub struct PgCommentRepository {
    db: PgPool,
}

impl PgCommentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self, comment), fields(post_id = comment.post_id, user_id = comment.user_id))]
    async fn create(&self, comment: NewComment) -> Result<Comment, AppError> {
        let sql = format!(
            "INSERT INTO comments (post_id, user_id, author, text)
             VALUES ($1, $2, $3, $4)
             RETURNING {COMMENT_COLUMNS}"
        );

        sqlx::query_as::<_, Comment>(&sql)
            .bind(db_id(comment.post_id))
            .bind(db_id(comment.user_id))
            .bind(&comment.author)
            .bind(&comment.text)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                // The post may vanish between the existence check and the insert.
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::not_found(Entity::Post);
                }
                AppError::database(e)
            })
    }

    #[instrument(skip(self))]
    async fn read(&self, id: u64) -> Result<Comment, AppError> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");

        sqlx::query_as::<_, Comment>(&sql)
            .bind(db_id(id))
            .fetch_optional(&self.db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(Entity::Comment))
    }

    #[instrument(skip(self))]
    async fn reads_by_post(
        &self,
        post_id: u64,
        pageable: &mut Pageable,
    ) -> Result<Vec<Comment>, AppError> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = $1
             ORDER BY {} LIMIT $2 OFFSET $3",
            pageable.order_by(SORT_COLUMNS)
        );
        let (limit, offset) = (pageable.limit(), pageable.offset());
        let post_id = db_id(post_id);

        let count = async {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
                .bind(post_id)
                .fetch_one(&self.db)
                .await
                .map_err(AppError::database)
        };
        let fetch = async {
            sqlx::query_as::<_, Comment>(&sql)
                .bind(post_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.db)
                .await
                .map_err(AppError::database)
        };

        fetch_page(pageable, count, fetch).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: u64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(db_id(id))
            .execute(&self.db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(Entity::Comment));
        }

        Ok(())
    }
}
