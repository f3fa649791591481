use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_comment, delete_comment, get_comments_by_post};
use crate::state::AppState;

/// `GET /{id}` lists the comments of post `id`; `DELETE /{id}` removes
/// comment `id`. One path segment serves both.
pub fn init_comments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_comment))
        .route("/{id}", get(get_comments_by_post).delete(delete_comment))
}
