//! Identity provider ports.
//!
//! Authentication is fully delegated: the provider issues tokens, this
//! application only validates them and trusts the embedded identity.
//! Role assignment also lives at the provider, reached through its
//! management API.
//!
//! # Contract
//!
//! `SessionValidator` implementations must:
//! - Validate the token signature against the provider's published keys
//! - Validate issuer and expiry claims
//! - Return `AuthError::InvalidToken` for malformed or bad-signature tokens
//! - Return `AuthError::TokenExpired` for expired tokens
//! - Return `AuthError::ServiceUnavailable` for transient errors

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, DomainError, UserId};

/// Validates access tokens and extracts caller identity.
///
/// HTTP middleware uses this to validate Bearer tokens; the resulting
/// `AuthenticatedUser` is the only identity the application trusts.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validates a bearer token and returns the authenticated caller.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

/// Management-side operations against the identity provider.
#[async_trait]
pub trait IdentityAdmin: Send + Sync {
    /// Assigns the educator role to a user in the provider's metadata.
    ///
    /// Takes effect on the user's next issued token.
    async fn assign_educator_role(&self, user_id: &UserId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_validator_is_object_safe() {
        fn _accepts_dyn(_validator: &dyn SessionValidator) {}
    }

    #[test]
    fn identity_admin_is_object_safe() {
        fn _accepts_dyn(_admin: &dyn IdentityAdmin) {}
    }
}
