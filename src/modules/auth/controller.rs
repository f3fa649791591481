use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use quill_core::AppError;
use quill_core::errors::ErrorResponse;
use quill_models::{LoginDto, RegisterDto, TokenResponse};

use super::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new account and receive an access token
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "User registered", body = TokenResponse),
        (status = 400, description = "Validation failed, or username/email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterDto>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let token = AuthService::register(state.users.as_ref(), &state.jwt_config, dto).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// Exchange email and password for an access token
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Wrong email or password", body = ErrorResponse),
        (status = 401, description = "Account disabled", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = AuthService::login(state.users.as_ref(), &state.jwt_config, dto).await?;
    Ok(Json(token))
}
