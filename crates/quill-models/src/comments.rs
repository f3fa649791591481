use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Comment {
    #[sqlx(try_from = "i64")]
    pub id: u64,
    #[sqlx(try_from = "i64")]
    pub post_id: u64,
    #[sqlx(try_from = "i64")]
    pub user_id: u64,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: u64,
    pub user_id: u64,
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: u64,
    pub post_id: u64,
    pub user_id: u64,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            author: comment.author,
            text: comment.text,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentDto {
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "text must be 2-100 characters"))]
    pub text: String,
    #[validate(range(min = 1, message = "postId is required"))]
    #[serde(default)]
    pub post_id: u64,
}
