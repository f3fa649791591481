use tracing::{info, instrument};

use quill_auth::rbac::authorize_self_or_role;
use quill_auth::{Claims, Role, Status};
use quill_core::{AppError, Pageable, hash_password};
use quill_models::{CreateUserDto, NewUser, UpdateUserDto, UserResponse};

use crate::repository::UserRepository;

pub struct UserService;

impl UserService {
    #[instrument(skip(users, dto), fields(username = %dto.username))]
    pub async fn create_user(
        users: &dyn UserRepository,
        dto: CreateUserDto,
    ) -> Result<UserResponse, AppError> {
        let password_hash = hash_password(&dto.password)?;

        let user = users
            .create(NewUser {
                username: dto.username,
                email: dto.email,
                password_hash,
                role: Role::Registered,
                status: Status::Active,
            })
            .await?;

        info!(user_id = user.id, "User created");
        Ok(user.into())
    }

    #[instrument(skip(users))]
    pub async fn get_user(users: &dyn UserRepository, id: u64) -> Result<UserResponse, AppError> {
        Ok(users.read(id).await?.into())
    }

    #[instrument(skip(users))]
    pub async fn get_users(
        users: &dyn UserRepository,
        pageable: &mut Pageable,
    ) -> Result<Vec<UserResponse>, AppError> {
        let rows = users.reads(pageable).await?;
        Ok(rows.into_iter().map(UserResponse::from).collect())
    }

    /// Owners may rename themselves; admins may rename anyone. The
    /// authorization check runs before the lookup.
    #[instrument(skip(users, claims, dto), fields(actor = claims.uid))]
    pub async fn update_user(
        users: &dyn UserRepository,
        claims: &Claims,
        id: u64,
        dto: UpdateUserDto,
    ) -> Result<UserResponse, AppError> {
        authorize_self_or_role(Some(claims), id, Role::Admin)?;

        let mut user = users.read(id).await?;
        user.username = dto.username;

        let updated = users.update(&user).await?;
        info!(user_id = updated.id, "User updated");
        Ok(updated.into())
    }

    #[instrument(skip(users))]
    pub async fn update_role(
        users: &dyn UserRepository,
        id: u64,
        role: Role,
    ) -> Result<UserResponse, AppError> {
        let mut user = users.read(id).await?;
        user.role = role;

        let updated = users.update(&user).await?;
        info!(user_id = updated.id, role = %updated.role, "User role changed");
        Ok(updated.into())
    }

    #[instrument(skip(users))]
    pub async fn update_status(
        users: &dyn UserRepository,
        id: u64,
        status: Status,
    ) -> Result<UserResponse, AppError> {
        let mut user = users.read(id).await?;
        user.status = status;

        let updated = users.update(&user).await?;
        info!(user_id = updated.id, status = %updated.status, "User status changed");
        Ok(updated.into())
    }

    #[instrument(skip(users))]
    pub async fn delete_user(users: &dyn UserRepository, id: u64) -> Result<u64, AppError> {
        users.read(id).await?;
        users.delete(id).await?;

        info!(user_id = id, "User deleted");
        Ok(id)
    }
}
