//! Caller identity resolution and gating of mutating operations.
//!
//! The guard owns no state. Token validation is delegated to a
//! [`SessionResolver`] and identity lookup to an [`IdentityDirectory`].

use std::future::Future;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// An authenticated, active user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: DbId,
    pub name: String,
}

/// Outcome of resolving a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Identified(Identity),
    /// No token, or a token that does not validate.
    Anonymous,
    /// The token names an identity that no longer exists or was deactivated.
    Revoked(DbId),
}

/// Lookup of identities by id.
pub trait IdentityDirectory: Send + Sync {
    /// The identity with `id` if it exists and is active.
    fn find_active(
        &self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Identity>, CoreError>> + Send;
}

/// Opaque session-token validation.
pub trait SessionResolver: Send + Sync {
    /// The identity id a token was issued for, or `None` if it is invalid.
    fn resolve(&self, token: &str) -> Option<DbId>;

    /// Invalidate every session issued for `identity_id`.
    fn invalidate(&self, identity_id: DbId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Resolves callers and rejects unauthenticated mutation.
pub struct AccessGuard<D, R> {
    directory: D,
    sessions: R,
}

impl<D: IdentityDirectory, R: SessionResolver> AccessGuard<D, R> {
    pub fn new(directory: D, sessions: R) -> Self {
        Self {
            directory,
            sessions,
        }
    }

    pub fn sessions(&self) -> &R {
        &self.sessions
    }

    pub async fn resolve_identity(&self, token: Option<&str>) -> Result<Resolution, CoreError> {
        let Some(identity_id) = token.and_then(|t| self.sessions.resolve(t)) else {
            return Ok(Resolution::Anonymous);
        };

        match self.directory.find_active(identity_id).await? {
            Some(identity) => Ok(Resolution::Identified(identity)),
            None => Ok(Resolution::Revoked(identity_id)),
        }
    }

    /// Resolve an optional viewer. Revoked sessions are invalidated and the
    /// caller is treated as anonymous.
    pub async fn resolve_viewer(&self, token: Option<&str>) -> Result<Option<Identity>, CoreError> {
        match self.resolve_identity(token).await? {
            Resolution::Identified(identity) => Ok(Some(identity)),
            Resolution::Anonymous => Ok(None),
            Resolution::Revoked(id) => {
                self.invalidate(id).await?;
                Ok(None)
            }
        }
    }

    /// Resolve the caller or fail with `Unauthorized`.
    pub async fn require_identity(&self, token: Option<&str>) -> Result<Identity, CoreError> {
        if token.is_none() {
            return Err(CoreError::Unauthorized("Login required".into()));
        }

        match self.resolve_identity(token).await? {
            Resolution::Identified(identity) => Ok(identity),
            Resolution::Anonymous => Err(CoreError::Unauthorized(
                "Invalid or expired session".into(),
            )),
            Resolution::Revoked(id) => {
                self.invalidate(id).await?;
                Err(CoreError::Unauthorized("Identity no longer exists".into()))
            }
        }
    }

    async fn invalidate(&self, identity_id: DbId) -> Result<(), CoreError> {
        tracing::info!(user_id = identity_id, "Invalidating sessions of revoked identity");
        self.sessions.invalidate(identity_id).await
    }
}
