use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use quill_auth::{Role, Status};
use quill_core::errors::{ErrorResponse, FieldViolation};
use quill_core::{PageableQuery, SortDirection};
use quill_models::{
    CommentResponse, CreateCommentDto, CreatePostDto, CreateUserDto, IdResponse, LoginDto,
    PostResponse, RegisterDto, TokenResponse, UpdatePostDto, UpdateRoleDto, UpdateStatusDto,
    UpdateUserDto, UserResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::update_user_role,
        crate::modules::users::controller::update_user_status,
        crate::modules::users::controller::delete_user,
        crate::modules::posts::controller::create_post,
        crate::modules::posts::controller::get_posts,
        crate::modules::posts::controller::get_post,
        crate::modules::posts::controller::update_post,
        crate::modules::posts::controller::delete_post,
        crate::modules::comments::controller::create_comment,
        crate::modules::comments::controller::get_comments_by_post,
        crate::modules::comments::controller::delete_comment,
    ),
    components(
        schemas(
            Role,
            Status,
            RegisterDto,
            LoginDto,
            TokenResponse,
            CreateUserDto,
            UpdateUserDto,
            UpdateRoleDto,
            UpdateStatusDto,
            UserResponse,
            CreatePostDto,
            UpdatePostDto,
            PostResponse,
            CreateCommentDto,
            CommentResponse,
            IdResponse,
            PageableQuery,
            SortDirection,
            ErrorResponse,
            FieldViolation,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "User administration"),
        (name = "Posts", description = "Blog posts"),
        (name = "Comments", description = "Comments on posts")
    ),
    info(
        title = "Quill API",
        version = "0.1.0",
        description = "Blog backend with role-based access control, built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
