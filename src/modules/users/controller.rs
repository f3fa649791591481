use axum::{
    Json,
    extract::{OriginalUri, State},
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;

use quill_core::errors::ErrorResponse;
use quill_core::{AppError, Pageable, PageableQuery};
use quill_models::{
    CreateUserDto, IdResponse, UpdateRoleDto, UpdateStatusDto, UpdateUserDto, UserResponse,
};

use super::service::UserService;
use crate::middleware::{RequireAdmin, RequireMod, RequireRegistered};
use crate::state::AppState;
use crate::validator::{PathId, ValidatedJson};

/// Create a user (admin only)
#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failed, or username/email already taken", body = ErrorResponse),
        (status = 401, description = "Requires admin", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = UserService::create_user(state.users.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List users, one page at a time (mod and above)
#[utoipa::path(
    get,
    path = "/v1/users",
    params(PageableQuery),
    responses(
        (status = 200, description = "Page of users; see Link and X-Total-* headers", body = Vec<UserResponse>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 401, description = "Requires mod", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, uri))]
pub async fn get_users(
    State(state): State<AppState>,
    RequireMod(_moderator): RequireMod,
    OriginalUri(uri): OriginalUri,
    mut pageable: Pageable,
) -> Result<(HeaderMap, Json<Vec<UserResponse>>), AppError> {
    let users = UserService::get_users(state.users.as_ref(), &mut pageable).await?;
    Ok((pageable.headers(&uri), Json(users)))
}

/// Get a user by id (mod and above)
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 401, description = "Requires mod", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    RequireMod(_moderator): RequireMod,
    PathId(id): PathId,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::get_user(state.users.as_ref(), id).await?;
    Ok(Json(user))
}

/// Rename a user (the user themselves, or an admin)
#[utoipa::path(
    put,
    path = "/v1/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation failed, or username already taken", body = ErrorResponse),
        (status = 401, description = "Not the owner and not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    RequireRegistered(auth_user): RequireRegistered,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::update_user(state.users.as_ref(), auth_user.claims(), id, dto).await?;
    Ok(Json(user))
}

/// Change a user's role (admin only)
#[utoipa::path(
    patch,
    path = "/v1/users/{id}/role",
    params(("id" = u64, Path, description = "User ID")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role changed", body = UserResponse),
        (status = 401, description = "Requires admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_user_role(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateRoleDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::update_role(state.users.as_ref(), id, dto.role).await?;
    Ok(Json(user))
}

/// Activate or deactivate a user (admin only)
#[utoipa::path(
    patch,
    path = "/v1/users/{id}/status",
    params(("id" = u64, Path, description = "User ID")),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status changed", body = UserResponse),
        (status = 401, description = "Requires admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_user_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateStatusDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::update_status(state.users.as_ref(), id, dto.status).await?;
    Ok(Json(user))
}

/// Delete a user (admin only)
#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = IdResponse),
        (status = 401, description = "Requires admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    PathId(id): PathId,
) -> Result<Json<IdResponse>, AppError> {
    let id = UserService::delete_user(state.users.as_ref(), id).await?;
    Ok(Json(IdResponse { id }))
}
