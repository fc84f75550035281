//! Port to the identity collaborator that owns user accounts.

use crate::shared::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Read-only view of registered users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns whether a user account exists.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError`] when the lookup fails.
    async fn exists(&self, user_id: UserId) -> Result<bool, UserDirectoryError>;
}

/// Errors returned by user directory implementations.
#[derive(Debug, Clone, Error)]
pub enum UserDirectoryError {
    /// The identity collaborator failed.
    #[error("user directory unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserDirectoryError {
    /// Wraps an underlying failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
