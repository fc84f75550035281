//! In-memory user directory.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::shared::UserId;
use crate::workspace::ports::{UserDirectory, UserDirectoryError};

/// Thread-safe set of known users.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashSet<UserId>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user account and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError`] when the internal lock is poisoned.
    pub fn register(&self, user_id: UserId) -> Result<UserId, UserDirectoryError> {
        let mut users = self.users.write().map_err(|err| {
            UserDirectoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        users.insert(user_id);
        Ok(user_id)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn exists(&self, user_id: UserId) -> Result<bool, UserDirectoryError> {
        let users = self.users.read().map_err(|err| {
            UserDirectoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        Ok(users.contains(&user_id))
    }
}
