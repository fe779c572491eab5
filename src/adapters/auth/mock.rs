//! Mock identity adapter for development and integration tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, DomainError, UserId};
use crate::ports::{IdentityAdmin, SessionValidator};

/// Validator backed by a static token table.
pub struct MockSessionValidator {
    tokens: Mutex<HashMap<String, AuthenticatedUser>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a token that validates to the given user.
    pub fn register(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens.lock().unwrap().insert(token.into(), user);
    }
}

impl Default for MockSessionValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.tokens
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// Identity admin that records promotions in memory.
pub struct MockIdentityAdmin {
    promoted: Mutex<Vec<UserId>>,
}

impl MockIdentityAdmin {
    pub fn new() -> Self {
        Self {
            promoted: Mutex::new(Vec::new()),
        }
    }

    /// Users promoted so far.
    pub fn promoted(&self) -> Vec<UserId> {
        self.promoted.lock().unwrap().clone()
    }
}

impl Default for MockIdentityAdmin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityAdmin for MockIdentityAdmin {
    async fn assign_educator_role(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.promoted.lock().unwrap().push(user_id.clone());
        Ok(())
    }
}
