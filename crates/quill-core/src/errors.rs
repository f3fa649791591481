//! Application error taxonomy.
//!
//! Every failure a handler can surface is an [`AppError`]: an [`ErrorKind`]
//! that decides the status code and the machine-readable `code`, plus an
//! `anyhow` source that is logged but never sent to the client.

use std::fmt;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Entities that can be looked up by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Post,
    Comment,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::User => "user",
            Entity::Post => "post",
            Entity::Comment => "comment",
        })
    }
}

/// Columns guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
        })
    }
}

/// One violated rule on one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("missing authorization header")]
    MissingCredential,
    #[error("invalid token")]
    InvalidCredential,
    #[error("token has expired")]
    ExpiredCredential,
    #[error("unauthorized user")]
    Unauthorized,
    #[error("invalid request")]
    InvalidRequest,
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("{0} is already taken")]
    AlreadyTaken(UniqueField),
    #[error("validation failed")]
    ValidationFailed(Vec<FieldViolation>),
    #[error("email or password is incorrect")]
    LoginFailed,
    #[error("user is disabled")]
    UserDisabled,
    #[error("invalid id")]
    InvalidId,
    #[error("{0}")]
    Binding(String),
    #[error("unexpected error")]
    Unexpected,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::MissingCredential
            | ErrorKind::InvalidCredential
            | ErrorKind::ExpiredCredential
            | ErrorKind::Unauthorized
            | ErrorKind::UserDisabled => StatusCode::UNAUTHORIZED,
            ErrorKind::InvalidRequest
            | ErrorKind::AlreadyTaken(_)
            | ErrorKind::ValidationFailed(_)
            | ErrorKind::LoginFailed
            | ErrorKind::InvalidId
            | ErrorKind::Binding(_) => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
            ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code returned in the `code` field.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingCredential => "auth/missing-header",
            ErrorKind::InvalidCredential => "auth/invalid-token",
            ErrorKind::ExpiredCredential => "auth/expired-token",
            ErrorKind::Unauthorized => "un/unauthorized",
            ErrorKind::InvalidRequest => "un/invalid-request",
            ErrorKind::NotFound(Entity::User) => "user/user-not-found",
            ErrorKind::NotFound(Entity::Post) => "post/not-found",
            ErrorKind::NotFound(Entity::Comment) => "comment/not-found",
            ErrorKind::AlreadyTaken(UniqueField::Username) => "auth/username-taken",
            ErrorKind::AlreadyTaken(UniqueField::Email) => "auth/email-taken",
            ErrorKind::ValidationFailed(_) => "req/validation",
            ErrorKind::LoginFailed => "auth/login-failed",
            ErrorKind::UserDisabled => "auth/user-disabled",
            ErrorKind::InvalidId => "com/invalid-id",
            ErrorKind::Binding(_) => "req/binding",
            ErrorKind::Unexpected => "un/unexpected",
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status: kind.status(),
            kind,
            error: err.into(),
        }
    }

    fn from_kind(kind: ErrorKind) -> Self {
        let error = anyhow::anyhow!("{}", kind);
        Self::new(kind, error)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Unexpected, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Unexpected, err)
    }

    pub fn missing_credential() -> Self {
        Self::from_kind(ErrorKind::MissingCredential)
    }

    pub fn invalid_credential() -> Self {
        Self::from_kind(ErrorKind::InvalidCredential)
    }

    pub fn expired_credential() -> Self {
        Self::from_kind(ErrorKind::ExpiredCredential)
    }

    pub fn unauthorized() -> Self {
        Self::from_kind(ErrorKind::Unauthorized)
    }

    pub fn invalid_request() -> Self {
        Self::from_kind(ErrorKind::InvalidRequest)
    }

    pub fn not_found(entity: Entity) -> Self {
        Self::from_kind(ErrorKind::NotFound(entity))
    }

    pub fn already_taken(field: UniqueField) -> Self {
        Self::from_kind(ErrorKind::AlreadyTaken(field))
    }

    pub fn login_failed() -> Self {
        Self::from_kind(ErrorKind::LoginFailed)
    }

    pub fn user_disabled() -> Self {
        Self::from_kind(ErrorKind::UserDisabled)
    }

    pub fn invalid_id() -> Self {
        Self::from_kind(ErrorKind::InvalidId)
    }

    pub fn binding(message: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::Binding(message.into()))
    }

    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::from_kind(ErrorKind::ValidationFailed(violations))
    }

    /// Flattens `validator` output into one violation per failed rule,
    /// ordered by field name so responses are stable.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let violations = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldViolation {
                    field: field.to_string(),
                    code: error.code.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();

        Self::validation(violations)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(error = ?self.error, "Unexpected error while handling request");
        }

        let errors = match &self.kind {
            ErrorKind::ValidationFailed(violations) => Some(violations.clone()),
            _ => None,
        };

        let body = Json(ErrorResponse {
            code: self.kind.code().to_string(),
            error: self.kind.to_string(),
            errors,
        });

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
