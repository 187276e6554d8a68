//! JWT-backed session collaborator for the access guard.

use folio_core::access::SessionResolver;
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::repositories::SessionRepo;
use folio_db::DbPool;

use crate::auth::jwt::{validate_token, JwtConfig};

/// Resolves access tokens to user ids and revokes refresh sessions.
#[derive(Debug, Clone)]
pub struct JwtSessions {
    config: JwtConfig,
    pool: DbPool,
}

impl JwtSessions {
    pub fn new(config: JwtConfig, pool: DbPool) -> Self {
        Self { config, pool }
    }
}

impl SessionResolver for JwtSessions {
    fn resolve(&self, token: &str) -> Option<DbId> {
        match validate_token(token, &self.config) {
            Ok(claims) => Some(claims.sub),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected access token");
                None
            }
        }
    }

    async fn invalidate(&self, identity_id: DbId) -> Result<(), CoreError> {
        let revoked = SessionRepo::revoke_all_for_user(&self.pool, identity_id)
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        tracing::info!(user_id = identity_id, revoked, "Sessions revoked");
        Ok(())
    }
}
