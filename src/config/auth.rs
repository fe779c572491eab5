//! Authentication configuration (identity provider)

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Identity provider configuration (Clerk)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Token issuer URL; also the JWKS discovery base
    pub issuer_url: String,

    /// Management API secret key
    pub secret_key: String,
}

impl AuthConfig {
    /// Validate auth configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.issuer_url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_ISSUER_URL"));
        }
        if self.secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_SECRET_KEY"));
        }
        if *environment == Environment::Production && !self.issuer_url.starts_with("https://") {
            return Err(ValidationError::IssuerMustBeHttps);
        }
        Ok(())
    }
}
