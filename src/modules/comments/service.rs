use tracing::{info, instrument};

use quill_auth::rbac::authorize_self_or_role;
use quill_auth::{Claims, Role};
use quill_core::{AppError, Pageable};
use quill_models::{CommentResponse, CreateCommentDto, NewComment};

use crate::repository::{CommentRepository, PostRepository};

pub struct CommentService;

impl CommentService {
    #[instrument(skip(comments, posts, author, dto), fields(author = %author.username, post_id = dto.post_id))]
    pub async fn create_comment(
        comments: &dyn CommentRepository,
        posts: &dyn PostRepository,
        author: &Claims,
        dto: CreateCommentDto,
    ) -> Result<CommentResponse, AppError> {
        posts.read(dto.post_id).await?;

        let comment = comments
            .create(NewComment {
                post_id: dto.post_id,
                user_id: author.uid,
                author: author.username.clone(),
                text: dto.text,
            })
            .await?;

        info!(comment_id = comment.id, "Comment created");
        Ok(comment.into())
    }

    #[instrument(skip(comments))]
    pub async fn get_comments_by_post(
        comments: &dyn CommentRepository,
        post_id: u64,
        pageable: &mut Pageable,
    ) -> Result<Vec<CommentResponse>, AppError> {
        let rows = comments.reads_by_post(post_id, pageable).await?;
        Ok(rows.into_iter().map(CommentResponse::from).collect())
    }

    /// The comment's author or any moderator may delete it. A missing
    /// comment is reported before ownership is considered.
    #[instrument(skip(comments, claims), fields(actor = claims.uid))]
    pub async fn delete_comment(
        comments: &dyn CommentRepository,
        claims: &Claims,
        id: u64,
    ) -> Result<u64, AppError> {
        let comment = comments.read(id).await?;
        authorize_self_or_role(Some(claims), comment.user_id, Role::Mod)?;

        comments.delete(id).await?;
        info!(comment_id = id, "Comment deleted");
        Ok(id)
    }
}
