//! Feature modules. Each one has a `controller` (HTTP handlers with OpenAPI
//! annotations), a `service` (business rules over the repository traits)
//! and a `router`.

pub mod auth;
pub mod comments;
pub mod posts;
pub mod users;
