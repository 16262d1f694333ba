/// Password hashing module using bcrypt
///
/// User secrets are stored as salted, adaptive-cost bcrypt digests. The cost
/// factor is embedded in every hash, so verification always uses the cost and
/// salt the hash was created with.
///
/// # Security
///
/// - **Algorithm**: bcrypt (`$2b$`), also verifies `$2a$`/`$2y$` hashes
/// - **Cost**: 12 (2^12 key-expansion rounds)
/// - **Salt**: 16 random bytes per hash
/// - **Comparison**: constant time
///
/// bcrypt only reads the first 72 bytes of a secret.
///
/// # Example
///
/// ```
/// use cadastro_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("s3cret")?;
///
/// assert!(verify_password("s3cret", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use std::sync::OnceLock;

/// Work factor for new hashes
pub const HASH_COST: u32 = 12;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Stored hash could not be parsed
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// Blocking hash task did not complete
    #[error("Password task failed: {0}")]
    TaskFailed(String),
}

/// Hashes a password with bcrypt at [`HASH_COST`]
///
/// Every call draws a fresh salt, so hashing the same password twice yields
/// two different strings.
///
/// # Returns
///
/// Modular crypt format hash, e.g. `$2b$12$<22-char salt><31-char digest>`
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    bcrypt::hash(password, HASH_COST).map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored hash
///
/// # Returns
///
/// `Ok(true)` if the password matches, `Ok(false)` if it doesn't
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` when the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))
}

/// Hashes on tokio's blocking pool
///
/// bcrypt at cost 12 takes a few hundred milliseconds of CPU, which must not
/// run on an async worker thread.
pub async fn hash_password_async(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
}

/// Verifies on tokio's blocking pool
pub async fn verify_password_async(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
}

/// Burns one verification against a throwaway hash of the same cost
///
/// Login calls this when the email is unknown so that the response takes as
/// long as a wrong-password attempt. Always resolves to `Ok(false)`.
pub async fn verify_against_dummy(password: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || {
        let hash = dummy_hash()?;
        verify_password(&password, hash).map(|_| false)
    })
    .await
    .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
}

fn dummy_hash() -> Result<&'static str, PasswordError> {
    static DUMMY: OnceLock<String> = OnceLock::new();

    if let Some(hash) = DUMMY.get() {
        return Ok(hash.as_str());
    }

    let hash = hash_password("cadastro-timing-equalizer")?;
    Ok(DUMMY.get_or_init(|| hash).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_format() {
        let hash = hash_password("s3cret").expect("Hash should succeed");

        assert!(hash.starts_with("$2b$12$"));
        assert_eq!(hash.len(), 60);
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_password").expect("Hash 1 should succeed");
        let hash2 = hash_password("same_password").expect("Hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct_and_incorrect() {
        let hash = hash_password("correct_password").expect("Hash should succeed");

        assert!(verify_password("correct_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash(_))));
    }

    #[test]
    fn test_verify_accepts_2a_prefix() {
        // Hashes written by older bcrypt implementations use the $2a$ prefix.
        let hash = hash_password("legacy").unwrap().replacen("$2b$", "$2a$", 1);
        assert!(verify_password("legacy", &hash).unwrap());
    }

    #[test]
    fn test_unicode_password_roundtrip() {
        let hash = hash_password("senha-çãé-密码").unwrap();
        assert!(verify_password("senha-çãé-密码", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_async_wrappers() {
        let hash = hash_password_async("s3cret".to_string()).await.unwrap();

        assert!(verify_password_async("s3cret".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password_async("nope".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_dummy_verification_never_matches() {
        let result = verify_against_dummy("cadastro-timing-equalizer".to_string()).await;
        assert!(!result.unwrap());
    }
}
