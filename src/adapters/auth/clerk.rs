//! Clerk adapter for token validation and role management.
//!
//! Implements the `SessionValidator` port against Clerk as the identity
//! provider:
//!
//! 1. Fetch JWKS from Clerk's well-known endpoint (cached)
//! 2. Validate the JWT signature against the published keys
//! 3. Validate issuer and expiry claims
//! 4. Map claims to the domain `AuthenticatedUser` type
//!
//! Also implements `IdentityAdmin`: educator promotion writes the role
//! into the user's public metadata through Clerk's management API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    AuthError, AuthenticatedUser, DomainError, ErrorCode, UserId, UserRole,
};
use crate::ports::{IdentityAdmin, SessionValidator};

/// Configuration for the Clerk adapter.
#[derive(Clone)]
pub struct ClerkConfig {
    /// Issuer URL of the Clerk instance; also the JWKS discovery base.
    pub issuer_url: String,

    /// Management API secret key (sk_...).
    pub secret_key: SecretString,

    /// Management API base URL.
    pub api_base_url: String,

    /// How long to cache JWKS before refetching.
    pub jwks_cache_duration: Duration,
}

impl ClerkConfig {
    /// Create a new configuration with required fields.
    pub fn new(issuer_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            secret_key: SecretString::new(secret_key.into()),
            api_base_url: "https://api.clerk.com".to_string(),
            jwks_cache_duration: Duration::from_secs(3600),
        }
    }

    fn jwks_url(&self) -> String {
        format!(
            "{}/.well-known/jwks.json",
            self.issuer_url.trim_end_matches('/')
        )
    }
}

/// JWT claims carried in Clerk session tokens.
#[derive(Debug, Deserialize)]
struct ClerkClaims {
    /// Subject - the user id.
    sub: String,

    /// User's email address.
    #[serde(default)]
    email: Option<String>,

    /// User's display name.
    #[serde(default)]
    name: Option<String>,

    /// Profile image URL.
    #[serde(default)]
    picture: Option<String>,

    /// Role claim from public metadata.
    #[serde(default)]
    role: Option<String>,
}

impl ClerkClaims {
    fn into_user(self) -> Result<AuthenticatedUser, AuthError> {
        Ok(AuthenticatedUser {
            id: UserId::new(self.sub).map_err(|_| AuthError::InvalidToken)?,
            email: self.email.unwrap_or_default(),
            display_name: self.name,
            image_url: self.picture,
            role: self
                .role
                .as_deref()
                .map(UserRole::from_claim)
                .unwrap_or(UserRole::Student),
        })
    }
}

/// Cached JWKS with expiry tracking.
struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// Clerk session validator and management client.
pub struct ClerkAdapter {
    config: ClerkConfig,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl ClerkAdapter {
    /// Create a new adapter with the given configuration.
    pub fn new(config: ClerkConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            jwks_cache: Arc::new(RwLock::new(None)),
        }
    }

    async fn jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.config.jwks_cache_duration {
                    return Ok(cached.jwks.clone());
                }
            }
        }

        let jwks: JwkSet = self
            .http_client
            .get(self.config.jwks_url())
            .send()
            .await
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?;

        let mut cache = self.jwks_cache.write().await;
        *cache = Some(JwksCache {
            jwks: jwks.clone(),
            fetched_at: Instant::now(),
        });

        Ok(jwks)
    }
}

#[async_trait]
impl SessionValidator for ClerkAdapter {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::InvalidToken)?;
        let kid = header.kid.ok_or(AuthError::InvalidToken)?;

        let jwks = self.jwks().await?;
        let jwk = jwks.find(&kid).ok_or(AuthError::InvalidToken)?;
        let key = DecodingKey::from_jwk(jwk).map_err(|_| AuthError::InvalidToken)?;

        let mut validation = Validation::new(header.alg);
        validation.set_issuer(&[&self.config.issuer_url]);
        // Clerk session tokens carry the authorized party rather than a
        // conventional audience claim.
        validation.validate_aud = false;

        let data = decode::<ClerkClaims>(token, &key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        data.claims.into_user()
    }
}

#[async_trait]
impl IdentityAdmin for ClerkAdapter {
    async fn assign_educator_role(&self, user_id: &UserId) -> Result<(), DomainError> {
        let url = format!(
            "{}/v1/users/{}/metadata",
            self.config.api_base_url, user_id
        );

        let response = self
            .http_client
            .patch(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .json(&serde_json::json!({
                "public_metadata": { "role": "educator" }
            }))
            .send()
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::ExternalServiceError, e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("identity provider returned HTTP {}", response.status()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwks_url_derives_from_issuer() {
        let config = ClerkConfig::new("https://clerk.example.com/", "sk_test_x");
        assert_eq!(
            config.jwks_url(),
            "https://clerk.example.com/.well-known/jwks.json"
        );
    }

    #[test]
    fn claims_map_to_authenticated_user() {
        let claims = ClerkClaims {
            sub: "user_abc".to_string(),
            email: Some("a@example.com".to_string()),
            name: Some("Alice".to_string()),
            picture: None,
            role: Some("educator".to_string()),
        };

        let user = claims.into_user().unwrap();

        assert_eq!(user.id.as_str(), "user_abc");
        assert_eq!(user.role, UserRole::Educator);
        assert!(user.is_educator());
    }

    #[test]
    fn missing_role_claim_defaults_to_student() {
        let claims = ClerkClaims {
            sub: "user_abc".to_string(),
            email: None,
            name: None,
            picture: None,
            role: None,
        };

        assert_eq!(claims.into_user().unwrap().role, UserRole::Student);
    }

    #[test]
    fn empty_subject_is_invalid() {
        let claims = ClerkClaims {
            sub: String::new(),
            email: None,
            name: None,
            picture: None,
            role: None,
        };

        assert!(matches!(claims.into_user(), Err(AuthError::InvalidToken)));
    }
}
