use axum::{
    Json,
    extract::{OriginalUri, State},
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;

use quill_core::errors::ErrorResponse;
use quill_core::{AppError, Pageable, PageableQuery};
use quill_models::{CommentResponse, CreateCommentDto, IdResponse};

use super::service::CommentService;
use crate::middleware::RequireRegistered;
use crate::state::AppState;
use crate::validator::{PathId, ValidatedJson};

#[utoipa::path(
    post,
    path = "/v1/comments",
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_comment(
    State(state): State<AppState>,
    RequireRegistered(auth_user): RequireRegistered,
    ValidatedJson(dto): ValidatedJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let comment = CommentService::create_comment(
        state.comments.as_ref(),
        state.posts.as_ref(),
        auth_user.claims(),
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    get,
    path = "/v1/comments/{postId}",
    params(
        ("postId" = u64, Path, description = "Post ID"),
        PageableQuery
    ),
    responses(
        (status = 200, description = "Page of comments on the post; see Link and X-Total-* headers", body = Vec<CommentResponse>),
        (status = 400, description = "Malformed id or paging parameters", body = ErrorResponse)
    ),
    tag = "Comments"
)]
#[instrument(skip(state, uri))]
pub async fn get_comments_by_post(
    State(state): State<AppState>,
    PathId(post_id): PathId,
    OriginalUri(uri): OriginalUri,
    mut pageable: Pageable,
) -> Result<(HeaderMap, Json<Vec<CommentResponse>>), AppError> {
    let comments =
        CommentService::get_comments_by_post(state.comments.as_ref(), post_id, &mut pageable)
            .await?;
    Ok((pageable.headers(&uri), Json(comments)))
}

#[utoipa::path(
    delete,
    path = "/v1/comments/{id}",
    params(("id" = u64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted", body = IdResponse),
        (status = 401, description = "Not the author and not a mod", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_comment(
    State(state): State<AppState>,
    RequireRegistered(auth_user): RequireRegistered,
    PathId(id): PathId,
) -> Result<Json<IdResponse>, AppError> {
    let id =
        CommentService::delete_comment(state.comments.as_ref(), auth_user.claims(), id).await?;
    Ok(Json(IdResponse { id }))
}
