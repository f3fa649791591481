//! Request extractors for authentication and authorization.
//!
//! - [`auth`]: [`AuthUser`](auth::AuthUser), the JWT gate
//! - [`role`]: `RequireRegistered`, `RequireMod`, `RequireAdmin`
//!
//! Handlers opt in by naming an extractor in their signature. Public
//! endpoints simply omit them.

pub mod auth;
pub mod role;

pub use auth::AuthUser;
pub use role::{RequireAdmin, RequireMod, RequireRegistered};
