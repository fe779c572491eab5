//! Axum routes for payment endpoints.

use axum::{routing::post, Router};

use crate::adapters::http::AppState;

use super::handlers::{create_checkout, handle_payment_webhook};

/// Checkout routes, mounted at `/api/payments`.
///
/// - `POST /checkout` - initiate a hosted checkout (authenticated)
pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/checkout", post(create_checkout))
}

/// Webhook routes, mounted at `/api/webhooks`.
///
/// Separate from the checkout routes because webhooks are authenticated
/// by signature, not by the identity provider.
///
/// - `POST /payment` - payment processor event delivery
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/payment", post(handle_payment_webhook))
}
