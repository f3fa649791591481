use tracing::{info, instrument};

use quill_auth::Claims;
use quill_core::{AppError, Pageable};
use quill_models::{CreatePostDto, NewPost, PostResponse, UpdatePostDto};

use crate::repository::PostRepository;

pub struct PostService;

impl PostService {
    #[instrument(skip(posts, author, dto), fields(author = %author.username))]
    pub async fn create_post(
        posts: &dyn PostRepository,
        author: &Claims,
        dto: CreatePostDto,
    ) -> Result<PostResponse, AppError> {
        let post = posts
            .create(NewPost {
                title: dto.title,
                body: dto.body,
                author: author.username.clone(),
            })
            .await?;

        info!(post_id = post.id, "Post created");
        Ok(post.into())
    }

    #[instrument(skip(posts))]
    pub async fn get_post(posts: &dyn PostRepository, id: u64) -> Result<PostResponse, AppError> {
        Ok(posts.read(id).await?.into())
    }

    #[instrument(skip(posts))]
    pub async fn get_posts(
        posts: &dyn PostRepository,
        pageable: &mut Pageable,
    ) -> Result<Vec<PostResponse>, AppError> {
        let rows = posts.reads(pageable).await?;
        Ok(rows.into_iter().map(PostResponse::from).collect())
    }

    /// Replaces the title. An absent or empty body keeps the stored one.
    #[instrument(skip(posts, editor, dto), fields(editor = %editor.username))]
    pub async fn update_post(
        posts: &dyn PostRepository,
        editor: &Claims,
        id: u64,
        dto: UpdatePostDto,
    ) -> Result<PostResponse, AppError> {
        let mut post = posts.read(id).await?;

        post.title = dto.title;
        if let Some(body) = dto.body.filter(|body| !body.is_empty()) {
            post.body = body;
        }
        post.updated_by = editor.username.clone();

        let updated = posts.update(&post).await?;
        info!(post_id = updated.id, "Post updated");
        Ok(updated.into())
    }

    #[instrument(skip(posts))]
    pub async fn delete_post(posts: &dyn PostRepository, id: u64) -> Result<u64, AppError> {
        posts.read(id).await?;
        posts.delete(id).await?;

        info!(post_id = id, "Post deleted");
        Ok(id)
    }
}
