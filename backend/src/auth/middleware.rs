//! Authenticated-caller extraction
//!
//! Every core operation receives the caller's user id from [`AuthUser`];
//! ownership checks happen in the services, not here.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use uuid::Uuid;

/// Authenticated user extracted from a bearer JWT
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = bearer_token(&parts.headers)?;

        let claims = app_state
            .jwt()
            .verify_access_token(token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        let user_id = claims
            .user_id()
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        Ok(AuthUser { user_id })
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(matches!(bearer_token(&headers), Err(ApiError::Unauthorized(_))));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(matches!(bearer_token(&headers), Err(ApiError::Unauthorized(_))));
    }
}
