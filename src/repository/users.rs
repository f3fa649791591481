use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use quill_core::{AppError, Entity, Pageable, UniqueField, fetch_page};
use quill_models::{NewUser, User};

use super::{UserRepository, db_id};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, status, created_at, updated_at";

const SORT_COLUMNS: &[&str] = &[
    "id",
    "username",
    "email",
    "role",
    "status",
    "created_at",
    "updated_at",
];

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        match db_err.constraint() {
            Some("users_username_key") => {
                return AppError::already_taken(UniqueField::Username);
            }
            Some("users_email_key") => return AppError::already_taken(UniqueField::Email),
            _ => {}
        }
    }
    AppError::database(err)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, role, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(user.status)
            .fetch_one(&self.db)
            .await
            .map_err(map_write_error)
    }

    #[instrument(skip(self))]
    async fn read(&self, id: u64) -> Result<User, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(db_id(id))
            .fetch_optional(&self.db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(Entity::User))
    }

    #[instrument(skip(self))]
    async fn read_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(self))]
    async fn reads(&self, pageable: &mut Pageable) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY {} LIMIT $1 OFFSET $2",
            pageable.order_by(SORT_COLUMNS)
        );
        let (limit, offset) = (pageable.limit(), pageable.offset());

        let count = async {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
                .fetch_one(&self.db)
                .await
                .map_err(AppError::database)
        };
        let fetch = async {
            sqlx::query_as::<_, User>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.db)
                .await
                .map_err(AppError::database)
        };

        fetch_page(pageable, count, fetch).await
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn update(&self, user: &User) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users
             SET username = $1, email = $2, role = $3, status = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(user.role)
            .bind(user.status)
            .bind(db_id(user.id))
            .fetch_optional(&self.db)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| AppError::not_found(Entity::User))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: u64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(db_id(id))
            .execute(&self.db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(Entity::User));
        }

        Ok(())
    }
}
