//! Registration and login payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterDto {
    #[serde(default)]
    #[validate(length(min = 3, max = 21, message = "username must be 3-21 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, max = 55, message = "password must be 6-55 characters"))]
    pub password: String,
    #[serde(default, rename = "termsOfService")]
    #[validate(custom(function = "must_accept_terms"))]
    pub terms_of_service: bool,
}

fn must_accept_terms(accepted: &bool) -> Result<(), ValidationError> {
    if *accepted {
        return Ok(());
    }
    Err(ValidationError::new("terms_not_accepted")
        .with_message("terms of service must be accepted".into()))
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
    #[serde(default)]
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, max = 55, message = "password must be 6-55 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}
