/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: bcrypt credential hashing and verification
/// - [`jwt`]: session token issuance and verification
/// - [`middleware`]: bearer-token gate for protected routes
///
/// # Example
///
/// ```no_run
/// use cadastro_shared::auth::password::{hash_password, verify_password};
/// use cadastro_shared::auth::jwt::{SessionSubject, TokenConfig, TokenService};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let tokens = TokenService::new(&TokenConfig { secret: "x".repeat(32) })?;
/// let token = tokens.issue(&SessionSubject { user_id: 1, email: "a@x.com".into() })?;
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod jwt;
pub mod middleware;
