//! # Quill Models
//!
//! Database entities and request/response DTOs.
//!
//! Entities (`User`, `Post`, `Comment`) map rows one-to-one and never leave
//! the server; handlers answer with the `*Response` types. Request DTOs carry
//! their validation rules, checked by the `ValidatedJson` extractor so every
//! violated field is reported at once.

pub mod auth;
pub mod comments;
pub mod common;
pub mod posts;
pub mod users;

pub use auth::{LoginDto, RegisterDto, TokenResponse};
pub use comments::{Comment, CommentResponse, CreateCommentDto, NewComment};
pub use common::IdResponse;
pub use posts::{CreatePostDto, NewPost, Post, PostResponse, UpdatePostDto};
pub use users::{
    CreateUserDto, NewUser, UpdateRoleDto, UpdateStatusDto, UpdateUserDto, User, UserResponse,
};
