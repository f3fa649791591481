//! Token issuance and verification.
//!
//! Tokens are signed with the server secret. Verification accepts the HMAC
//! family only (HS256, HS384, HS512) and maps failures onto the credential
//! error kinds: a bad signature, foreign algorithm, or malformed payload is
//! [`ErrorKind::InvalidCredential`](quill_core::ErrorKind::InvalidCredential);
//! a lapsed `exp` or `expiresAt` is
//! [`ErrorKind::ExpiredCredential`](quill_core::ErrorKind::ExpiredCredential).

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use quill_config::JwtConfig;
use quill_core::AppError;

use crate::claims::Claims;
use crate::roles::Role;

pub const ACCEPTED_ALGORITHMS: [Algorithm; 3] =
    [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

pub fn create_access_token(
    uid: u64,
    role: Role,
    username: &str,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let claims = Claims::new(
        uid,
        role,
        username,
        email,
        Utc::now(),
        Duration::seconds(jwt_config.access_token_expiry),
    );

    encode_claims(&claims, jwt_config)
}

/// Signs arbitrary claims with HS256.
pub fn encode_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
    validation
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        JwtErrorKind::ExpiredSignature => AppError::expired_credential(),
        _ => {
            debug!(error = %e, "Rejected bearer token");
            AppError::invalid_credential()
        }
    })?;

    let expiry = claims
        .expiry()
        .map_err(|_| AppError::invalid_credential())?;
    if expiry <= Utc::now() {
        return Err(AppError::expired_credential());
    }

    Ok(claims)
}
