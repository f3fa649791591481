//! Request body and path extractors that reject with [`AppError`].

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use quill_core::AppError;

/// JSON body that has passed `validator` rules.
///
/// A body that cannot be decoded is a binding error; a decoded body that
/// breaks a rule is a validation error listing every violated field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::binding(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::from_validation(&errors))?;

        Ok(ValidatedJson(value))
    }
}

/// A positive numeric `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub u64);

impl PathId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.parse::<u64>() {
            Ok(id) if id > 0 => Ok(PathId(id)),
            _ => Err(AppError::invalid_id()),
        }
    }
}

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::invalid_id())?;

        PathId::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use quill_core::ErrorKind;

    #[test]
    fn test_path_id_accepts_positive_integers() {
        assert_eq!(PathId::parse("42").unwrap(), PathId(42));
        assert_eq!(PathId::parse("18446744073709551615").unwrap().0, u64::MAX);
    }

    #[test]
    fn test_path_id_rejects_everything_else() {
        for raw in ["0", "-1", "abc", "", "1.5", "18446744073709551616"] {
            assert_matches!(
                PathId::parse(raw).unwrap_err().kind,
                ErrorKind::InvalidId,
                "{raw:?}"
            );
        }
    }
}
