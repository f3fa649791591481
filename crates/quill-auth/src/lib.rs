//! # Quill Auth
//!
//! Identity and authorization building blocks:
//!
//! - [`roles`]: the closed [`Role`] and [`Status`] enums and the role score table
//! - [`claims`]: the JWT payload carried by every authenticated request
//! - [`jwt`]: token issuance and verification (HMAC family only)
//! - [`rbac`]: pure authorization predicates over claims
//!
//! Roles form a total preorder by score: `Admin (15) > Mod (14) > Registered (13)`.
//! A requirement of `Mod` is met by `Mod` and `Admin`.
//!
//! ```ignore
//! use quill_auth::{Role, rbac::authorize_self_or_role};
//!
//! // Owners may edit their own profile; admins may edit anyone's.
//! let claims = authorize_self_or_role(Some(&auth.0), target_id, Role::Admin)?;
//! ```

pub mod claims;
pub mod jwt;
pub mod rbac;
pub mod roles;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use roles::{Role, Status};
