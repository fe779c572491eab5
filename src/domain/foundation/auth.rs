//! Authentication types for the domain layer.
//!
//! These types represent an authenticated caller extracted from a validated
//! identity-provider token. They have no provider dependencies: any OIDC
//! provider can populate them through the `SessionValidator` port.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;

/// Role claim assigned by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Default role: can browse, purchase, and study courses.
    Student,
    /// Can additionally publish and manage courses.
    Educator,
}

impl UserRole {
    /// Parses a role claim string; anything unrecognized is a student.
    pub fn from_claim(s: &str) -> Self {
        match s {
            "educator" => UserRole::Educator,
            _ => UserRole::Student,
        }
    }

    /// Returns the claim string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Educator => "educator",
        }
    }
}

/// Authenticated caller extracted from a validated token.
///
/// The core trusts this identity with no further verification; the
/// identity provider is the source of truth for who the caller is.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the identity provider.
    pub id: UserId,

    /// Email address from the token claims.
    pub email: String,

    /// Display name if the provider supplied one.
    pub display_name: Option<String>,

    /// Profile image URL if the provider supplied one.
    pub image_url: Option<String>,

    /// Role claim from the provider's public metadata.
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Returns true if the caller holds the educator role.
    pub fn is_educator(&self) -> bool {
        self.role == UserRole::Educator
    }
}

/// Errors from token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Token is malformed or its signature does not verify.
    #[error("Invalid token")]
    InvalidToken,

    /// Token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Identity provider could not be reached.
    #[error("Authentication service unavailable: {0}")]
    ServiceUnavailable(String),
}
