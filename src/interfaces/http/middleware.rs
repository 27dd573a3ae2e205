//! Bearer-token authentication
//!
//! Verifies the JWT and stores the caller's [`Principal`] in the request
//! extensions; handlers take it with `Extension<Principal>`.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::Principal;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};
use crate::interfaces::http::common::ApiResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the principal behind an `Authorization` header value.
pub fn authenticate(auth_header: Option<&str>, config: &JwtConfig) -> Result<Principal, AuthError> {
    let header = auth_header.ok_or(AuthError::MissingToken)?;
    let token = extract_token(header).ok_or(AuthError::InvalidToken)?;
    let claims = verify_token(token, config).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;
    if claims.is_expired() {
        return Err(AuthError::ExpiredToken);
    }
    claims.principal().ok_or(AuthError::InvalidToken)
}

pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authenticate(auth_header, &auth_state.jwt_config) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => auth_error_response(e),
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let message = match error {
        AuthError::MissingToken => "Missing authentication token",
        AuthError::InvalidToken => "Invalid authentication token",
        AuthError::ExpiredToken => "Token has expired",
    };
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infrastructure::crypto::jwt::create_token;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            ..Default::default()
        }
    }

    #[test]
    fn bearer_token_yields_principal() {
        let who = Principal::new(7, UserRole::Customer, Some(3));
        let token = create_token(&who, "c@example.com", &config()).unwrap();
        let header = format!("Bearer {}", token);
        assert_eq!(authenticate(Some(&header), &config()).unwrap(), who);
    }

    #[test]
    fn rejects_missing_and_malformed() {
        assert_eq!(authenticate(None, &config()), Err(AuthError::MissingToken));
        assert_eq!(
            authenticate(Some("Basic abc"), &config()),
            Err(AuthError::InvalidToken)
        );
        assert_eq!(
            authenticate(Some("Bearer not-a-jwt"), &config()),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn rejects_foreign_signature() {
        let who = Principal::new(1, UserRole::Admin, None);
        let other = JwtConfig {
            secret: "other".into(),
            ..Default::default()
        };
        let token = create_token(&who, "a@example.com", &other).unwrap();
        let header = format!("Bearer {}", token);
        assert_eq!(
            authenticate(Some(&header), &config()),
            Err(AuthError::InvalidToken)
        );
    }
}
