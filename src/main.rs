//! Edvora server binary - composition root.
//!
//! Constructs every adapter explicitly, wires them into the router, and
//! owns their lifecycle: config and pool at startup, graceful shutdown
//! draining in-flight requests (webhook deliveries cut off mid-flight
//! are simply redelivered by the processor).

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use edvora::adapters::auth::{ClerkAdapter, ClerkConfig};
use edvora::adapters::http::{api_router, AppState};
use edvora::adapters::media::{CloudinaryConfig, CloudinaryMediaStorage};
use edvora::adapters::postgres::{
    PostgresCourseRepository, PostgresProgressRepository, PostgresPurchaseRepository,
    PostgresUserRepository, PostgresWebhookEventRepository,
};
use edvora::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use edvora::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let clerk = Arc::new(ClerkAdapter::new(ClerkConfig::new(
        config.auth.issuer_url.clone(),
        config.auth.secret_key.clone(),
    )));

    let state = AppState {
        courses: Arc::new(PostgresCourseRepository::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        purchases: Arc::new(PostgresPurchaseRepository::new(pool.clone())),
        progress: Arc::new(PostgresProgressRepository::new(pool.clone())),
        webhook_events: Arc::new(PostgresWebhookEventRepository::new(pool.clone())),
        payment_provider: Arc::new(StripePaymentAdapter::new(StripeConfig::new(
            config.payment.stripe_api_key.clone(),
            config.payment.stripe_webhook_secret.clone(),
        ))),
        identity_admin: clerk.clone(),
        media: Arc::new(CloudinaryMediaStorage::new(CloudinaryConfig::new(
            config.media.cloud_name.clone(),
            config.media.upload_preset.clone(),
        ))),
        session_validator: clerk,
        currency: config.payment.currency.clone(),
    };

    let app = api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, environment = ?config.server.environment, "server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.server.cors_origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        let origins: Vec<http::HeaderValue> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received; draining in-flight requests");
}
