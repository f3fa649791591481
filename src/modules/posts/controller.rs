use axum::{
    Json,
    extract::{OriginalUri, State},
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;

use quill_core::errors::ErrorResponse;
use quill_core::{AppError, Pageable, PageableQuery};
use quill_models::{CreatePostDto, IdResponse, PostResponse, UpdatePostDto};

use super::service::PostService;
use crate::middleware::{RequireAdmin, RequireMod};
use crate::state::AppState;
use crate::validator::{PathId, ValidatedJson};

#[utoipa::path(
    post,
    path = "/v1/posts",
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Requires mod", body = ErrorResponse)
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_post(
    State(state): State<AppState>,
    RequireMod(auth_user): RequireMod,
    ValidatedJson(dto): ValidatedJson<CreatePostDto>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let post = PostService::create_post(state.posts.as_ref(), auth_user.claims(), dto).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[utoipa::path(
    get,
    path = "/v1/posts",
    params(PageableQuery),
    responses(
        (status = 200, description = "Page of posts; see Link and X-Total-* headers", body = Vec<PostResponse>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    ),
    tag = "Posts"
)]
#[instrument(skip(state, uri))]
pub async fn get_posts(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    mut pageable: Pageable,
) -> Result<(HeaderMap, Json<Vec<PostResponse>>), AppError> {
    let posts = PostService::get_posts(state.posts.as_ref(), &mut pageable).await?;
    Ok((pageable.headers(&uri), Json(posts)))
}

#[utoipa::path(
    get,
    path = "/v1/posts/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<PostResponse>, AppError> {
    let post = PostService::get_post(state.posts.as_ref(), id).await?;
    Ok(Json(post))
}

#[utoipa::path(
    put,
    path = "/v1/posts/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Requires mod", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_post(
    State(state): State<AppState>,
    RequireMod(auth_user): RequireMod,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdatePostDto>,
) -> Result<Json<PostResponse>, AppError> {
    let post = PostService::update_post(state.posts.as_ref(), auth_user.claims(), id, dto).await?;
    Ok(Json(post))
}

#[utoipa::path(
    delete,
    path = "/v1/posts/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = IdResponse),
        (status = 401, description = "Requires admin", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    PathId(id): PathId,
) -> Result<Json<IdResponse>, AppError> {
    let id = PostService::delete_post(state.posts.as_ref(), id).await?;
    Ok(Json(IdResponse { id }))
}
