//! # Quill Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`database`]: PostgreSQL connection settings
//! - [`server`]: listen address
//! - [`logging`]: log level, format, and optional log directory
//!
//! Every `from_env` constructor reads through a lookup function so the
//! parsing rules can be tested without touching the process environment.

pub mod cors;
pub mod database;
pub mod jwt;
pub mod logging;
pub mod server;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use logging::{LogConfig, LogFormat};
pub use server::ServerConfig;

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
