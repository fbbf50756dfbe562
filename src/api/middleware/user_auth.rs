//! Bearer token authentication

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::AuthError;
use crate::infrastructure::auth::Authenticated;

/// Extractor that requires a valid access token
///
/// Reads `Authorization: Bearer <token>` and runs the token validator.
/// Loading the user record is left to the handler.
#[derive(Debug, Clone)]
pub struct RequireToken(pub Authenticated);

impl FromRequestParts<AppState> for RequireToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        let authenticated = state
            .token_validator
            .validate(token)
            .map_err(AuthError::from)?;

        Ok(RequireToken(authenticated))
    }
}

/// Extract the raw token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let value = value
        .to_str()
        .map_err(|_| ApiError::invalid_token())?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(ApiError::invalid_token)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::unauthorized("Not authenticated"));
    }

    let token = token.trim();

    if token.is_empty() {
        return Err(ApiError::invalid_token());
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        let headers = headers("Bearer eyJhbGciOiJIUzI1NiJ9.test");
        assert_eq!(
            extract_bearer_token(&headers).unwrap(),
            "eyJhbGciOiJIUzI1NiJ9.test"
        );
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        assert_eq!(extract_bearer_token(&headers("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn test_missing_header() {
        let err = extract_bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_other_scheme() {
        let err = extract_bearer_token(&headers("Basic dXNlcjpwYXNz")).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_empty_and_schemeless() {
        assert!(extract_bearer_token(&headers("Bearer    ")).is_err());
        assert!(extract_bearer_token(&headers("token-without-scheme")).is_err());
    }

    #[test]
    fn test_trimmed_token() {
        assert_eq!(
            extract_bearer_token(&headers("Bearer   token-with-spaces   ")).unwrap(),
            "token-with-spaces"
        );
    }
}
