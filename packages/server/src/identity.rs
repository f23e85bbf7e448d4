use async_trait::async_trait;
use thiserror::Error;

use crate::utils::jwt;

/// A caller identity resolved from an `Authorization` header token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i32,
    pub username: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid or expired token")]
    InvalidToken,
    /// The backing identity service could not be reached.
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

/// Maps a bearer token to a caller identity.
///
/// Token issuance lives in an external auth service; this seam only resolves
/// tokens. Implementations are injected into `AppState` by the dispatcher and
/// are never process-global.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError>;
}

/// Production provider: verifies HS256 JWTs issued by the auth service with a
/// shared secret.
pub struct JwtIdentityProvider {
    secret: String,
}

impl JwtIdentityProvider {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError> {
        let claims = jwt::verify(token, &self.secret).map_err(|_| IdentityError::InvalidToken)?;
        Ok(Identity {
            user_id: claims.uid,
            username: claims.sub,
        })
    }
}
