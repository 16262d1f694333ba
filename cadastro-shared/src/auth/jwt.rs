/// Session token issuance and verification
///
/// Session tokens are JWTs signed with HS256 using a single process-wide
/// secret. They are stateless: a token is valid exactly when its signature
/// checks out and the current time is before its `exp` claim. There is no
/// server-side session store and no revocation.
///
/// # Claims
///
/// - `id`: user ID
/// - `email`: user email at login time
/// - `iat`: issued at (Unix seconds)
/// - `exp`: expiration, always `iat` + [`SESSION_TTL_SECS`]
///
/// # Example
///
/// ```
/// use cadastro_shared::auth::jwt::{SessionSubject, TokenConfig, TokenService};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new(&TokenConfig {
///     secret: "test-secret-key-at-least-32-bytes-long".to_string(),
/// })?;
///
/// let token = tokens.issue(&SessionSubject { user_id: 7, email: "a@x.com".to_string() })?;
/// let claims = tokens.verify(&token)?;
/// assert_eq!(claims.id, 7);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifetime of every session token, in seconds
pub const SESSION_TTL_SECS: i64 = 2 * 60 * 60;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// No signing secret configured
    #[error("Signing secret is empty")]
    MissingSecret,

    /// Failed to sign token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token is past its expiration
    #[error("Token has expired")]
    Expired,

    /// Malformed, tampered, or signed with another secret
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Signing configuration, loaded once at startup
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// HMAC secret for HS256
    pub secret: String,
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig").field("secret", &"<redacted>").finish()
    }
}

/// Identity a token is issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSubject {
    pub user_id: i32,
    pub email: String,
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub id: i32,

    /// User email
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Builds claims for a subject issued at `issued_at`
    pub fn new(subject: &SessionSubject, issued_at: DateTime<Utc>) -> Self {
        Self {
            id: subject.user_id,
            email: subject.email.clone(),
            iat: issued_at.timestamp(),
            exp: issued_at.timestamp() + SESSION_TTL_SECS,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Issues and verifies session tokens with one fixed secret
///
/// Cheap to clone; the API keeps one instance in its shared state.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates the service from configuration
    ///
    /// # Errors
    ///
    /// Returns `TokenError::MissingSecret` if the secret is empty
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        })
    }

    /// Issues a token valid for [`SESSION_TTL_SECS`] from now
    pub fn issue(&self, subject: &SessionSubject) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issues a token as if it had been issued at `issued_at`
    pub fn issue_at(
        &self,
        subject: &SessionSubject,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = SessionClaims::new(subject, issued_at);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::CreateError(e.to_string()))
    }

    /// Verifies signature and expiry and returns the claims
    ///
    /// # Errors
    ///
    /// - `TokenError::Expired` once `now >= exp`
    /// - `TokenError::Invalid` for malformed or tampered tokens and tokens
    ///   signed with a different secret
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?;

        // jsonwebtoken accepts exp == now; sessions end at exp.
        if token_data.claims.is_expired() {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}
