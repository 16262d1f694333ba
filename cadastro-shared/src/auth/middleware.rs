/// Bearer-token gate for protected routes
///
/// The gate only answers one question: does this request carry a valid
/// session token? It knows nothing about resources. On success the caller
/// inserts the returned [`AuthContext`] into the request extensions so
/// handlers can read who is calling.
///
/// # Rejections
///
/// - No `Authorization` header, or a header with nothing after the scheme:
///   [`AuthError::MissingCredentials`] (401)
/// - A token that fails verification for any reason, expiry included:
///   [`AuthError::InvalidToken`] (403)
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use cadastro_shared::auth::jwt::{SessionSubject, TokenConfig, TokenService};
/// use cadastro_shared::auth::middleware::authenticate;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new(&TokenConfig {
///     secret: "test-secret-key-at-least-32-bytes-long".to_string(),
/// })?;
/// let token = tokens.issue(&SessionSubject { user_id: 3, email: "a@x.com".to_string() })?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
///
/// let auth = authenticate(&headers, &tokens)?;
/// assert_eq!(auth.user_id, 3);
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

use super::jwt::{TokenError, TokenService};

/// Identity of the caller, placed in request extensions by the gate
///
/// Handlers read it with `Extension<AuthContext>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i32,

    /// Email the token was issued for
    pub email: String,
}

/// Gate rejection
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No bearer token on the request
    #[error("Token não fornecido")]
    MissingCredentials,

    /// Token present but rejected by verification
    #[error("Token inválido ou expirado")]
    InvalidToken(#[source] TokenError),
}

impl AuthError {
    /// HTTP status for this rejection
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(_) => StatusCode::FORBIDDEN,
        }
    }
}

/// Extracts the token from `Authorization: <scheme> <token>`
///
/// The scheme word is not inspected: whatever follows it is handed to
/// verification, so `Basic xyz` ends up as an invalid token (403) rather than
/// a missing one. Returns `None` when the header is absent, not valid UTF-8,
/// or has no second part.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.split_whitespace().nth(1)
}

/// Authenticates a request from its headers
///
/// # Errors
///
/// - `AuthError::MissingCredentials` when there is no bearer token
/// - `AuthError::InvalidToken` when the token does not verify
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingCredentials)?;

    let claims = tokens.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        AuthError::InvalidToken(e)
    })?;

    Ok(AuthContext {
        user_id: claims.id,
        email: claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{SessionSubject, TokenConfig};
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};

    fn tokens() -> TokenService {
        TokenService::new(&TokenConfig {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
        })
        .unwrap()
    }

    fn subject() -> SessionSubject {
        SessionSubject {
            user_id: 9,
            email: "bia@example.com".to_string(),
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authenticate_valid_token() {
        let tokens = tokens();
        let token = tokens.issue(&subject()).unwrap();

        let auth = authenticate(&headers_with(&format!("Bearer {}", token)), &tokens).unwrap();

        assert_eq!(auth.user_id, 9);
        assert_eq!(auth.email, "bia@example.com");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let err = authenticate(&HeaderMap::new(), &tokens()).unwrap_err();

        assert!(matches!(err, AuthError::MissingCredentials));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_scheme_without_token_is_unauthorized() {
        let err = authenticate(&headers_with("Bearer"), &tokens()).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));

        let err = authenticate(&headers_with("Bearer    "), &tokens()).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[test]
    fn test_other_scheme_is_verified_and_forbidden() {
        let err = authenticate(&headers_with("Basic dXNlcjpwYXNz"), &tokens()).unwrap_err();

        assert!(matches!(err, AuthError::InvalidToken(_)));
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_bare_token_without_scheme_is_unauthorized() {
        let tokens = tokens();
        let token = tokens.issue(&subject()).unwrap();

        let err = authenticate(&headers_with(&token), &tokens).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[test]
    fn test_garbage_token_is_forbidden() {
        let err = authenticate(&headers_with("Bearer not.a.token"), &tokens()).unwrap_err();

        assert!(matches!(err, AuthError::InvalidToken(_)));
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_expired_token_is_forbidden() {
        let tokens = tokens();
        let token = tokens
            .issue_at(&subject(), Utc::now() - Duration::hours(3))
            .unwrap();

        let err = authenticate(&headers_with(&format!("Bearer {}", token)), &tokens).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(TokenError::Expired)));
    }

    #[test]
    fn test_bearer_scheme_case_insensitive() {
        let tokens = tokens();
        let token = tokens.issue(&subject()).unwrap();

        assert!(authenticate(&headers_with(&format!("bearer {}", token)), &tokens).is_ok());
    }
}
