//! # Quill Core
//!
//! Foundational types shared by every Quill crate:
//!
//! - [`errors`]: the application error taxonomy and its HTTP mapping
//! - [`pagination`]: page/size/sort parsing, offsets, and `Link` header rendering
//! - [`password`]: bcrypt hashing and verification
//! - [`serde`]: serde helpers for lenient query parameters

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::{AppError, Entity, ErrorKind, FieldViolation, UniqueField};
pub use pagination::{Pageable, PageableQuery, SortDirection, fetch_page};
pub use password::{hash_password, hash_password_with_cost, verify_password};
