//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `EDVORA` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use edvora::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod media;
mod payment;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use media::MediaConfig;
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment
/// variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Authentication configuration (identity provider)
    pub auth: AuthConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Media configuration (asset host)
    pub media: MediaConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `EDVORA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `EDVORA__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `EDVORA__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or
    /// values cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EDVORA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.payment.validate()?;
        self.media.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("EDVORA__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("EDVORA__AUTH__ISSUER_URL", "https://clerk.example.com");
        env::set_var("EDVORA__AUTH__SECRET_KEY", "sk_test_auth");
        env::set_var("EDVORA__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
        env::set_var("EDVORA__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx");
        env::set_var("EDVORA__MEDIA__CLOUD_NAME", "edvora");
        env::set_var("EDVORA__MEDIA__UPLOAD_PRESET", "thumbnails");
    }

    fn clear_env() {
        env::remove_var("EDVORA__DATABASE__URL");
        env::remove_var("EDVORA__AUTH__ISSUER_URL");
        env::remove_var("EDVORA__AUTH__SECRET_KEY");
        env::remove_var("EDVORA__PAYMENT__STRIPE_API_KEY");
        env::remove_var("EDVORA__PAYMENT__STRIPE_WEBHOOK_SECRET");
        env::remove_var("EDVORA__MEDIA__CLOUD_NAME");
        env::remove_var("EDVORA__MEDIA__UPLOAD_PRESET");
        env::remove_var("EDVORA__SERVER__PORT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert!(config.validate().is_ok());
        assert_eq!(config.payment.currency, "usd");
    }

    #[test]
    fn test_server_port_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("EDVORA__SERVER__PORT", "8080");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 8080);
    }
}
