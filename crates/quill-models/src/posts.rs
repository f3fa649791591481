use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Post {
    #[sqlx(try_from = "i64")]
    pub id: u64,
    pub title: String,
    pub body: String,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            created_by: post.created_by,
            updated_by: post.updated_by,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePostDto {
    #[serde(default)]
    #[validate(length(min = 3, max = 21, message = "title must be 3-21 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "body is required"))]
    pub body: String,
}

/// `title` is always replaced; an absent or empty `body` keeps the current one.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePostDto {
    #[serde(default)]
    #[validate(length(min = 3, max = 21, message = "title must be 3-21 characters"))]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}
