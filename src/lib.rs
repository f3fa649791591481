//! # Quill API
//!
//! A blog backend built with Rust, Axum, and PostgreSQL: accounts with
//! role-based access control, posts, and comments, served as JSON under
//! `/v1`.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Admin commands (create-user, seed, migrate)
//! ├── middleware/       # Authentication gate and role extractors
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Register and login
//! │   ├── users/       # User administration
//! │   ├── posts/       # Posts
//! │   └── comments/    # Comments
//! ├── repository/       # Storage traits, PostgreSQL and in-memory backends
//! ├── docs.rs           # OpenAPI document
//! ├── logging.rs        # Subscriber setup and request logging
//! ├── router.rs         # Route table and global layers
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validated JSON and id path extractors
//! ```
//!
//! Shared building blocks live in the workspace crates:
//!
//! - [`quill_core`]: errors, pagination, password hashing
//! - [`quill_config`]: configuration from the environment
//! - [`quill_auth`]: roles, claims, JWT, authorization predicates
//! - [`quill_db`]: pool and migrations
//! - [`quill_models`]: entities and DTOs
//!
//! ## Roles
//!
//! | Role | Score | Can |
//! |------|-------|-----|
//! | admin | 15 | everything, including user role/status changes and deletions |
//! | mod | 14 | write posts, list users, delete any comment |
//! | registered | 13 | comment, edit own profile, delete own comments |
//!
//! A token is only honoured while the account still exists, is active, and
//! holds the role recorded in the token.
//!
//! ## Pagination
//!
//! List endpoints take `page`, `size` and `sort=field,asc|desc` and answer
//! with `Link`, `X-Total-Count`, `X-Total-Page` and `X-Has-Next` headers.
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod cli;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod repository;
pub mod router;
pub mod state;
pub mod validator;

pub use quill_config as config;

pub use quill_auth;
pub use quill_config;
pub use quill_core;
pub use quill_db;
pub use quill_models;
