//! Stripe payment provider adapter.
//!
//! Implements `PaymentProvider` against the Stripe API: hosted checkout
//! session creation and webhook signature verification.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) against replay
//! - The MAC is computed over the raw request body bytes; the payload is
//!   never re-serialized before verification
//! - Secrets held via `secrecy::SecretString`

use std::str::FromStr;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::PurchaseId;
use crate::domain::purchase::WebhookError;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider, WebhookEvent,
    WebhookEventKind,
};

use super::webhook_types::{
    SignatureHeader, StripeCheckoutSession, StripeCheckoutSessionResponse, StripeErrorResponse,
    StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for the Stripe API.
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Verify the webhook signature over the raw payload bytes.
    fn verify_signature(
        &self,
        payload: &[u8],
        header: &SignatureHeader,
    ) -> Result<(), WebhookError> {
        // 1. Timestamp window (replay defense)
        let now = chrono::Utc::now().timestamp();
        let age = now - header.timestamp;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                age_secs = age,
                "webhook event too old"
            );
            return Err(WebhookError::TimestampOutOfRange);
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                "webhook event timestamp in the future"
            );
            return Err(WebhookError::InvalidTimestamp);
        }

        // 2. Expected signature: HMAC-SHA256 over "<timestamp>.<raw body>".
        //    The body bytes are fed to the MAC untouched; any
        //    re-serialization would change them and fail verification.
        let mut mac = HmacSha256::new_from_slice(
            self.config.webhook_secret.expose_secret().as_bytes(),
        )
        .expect("HMAC accepts any key length");
        mac.update(header.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        // 3. Constant-time comparison
        if expected.as_slice().ct_eq(&header.v1_signature).unwrap_u8() != 1 {
            tracing::warn!("invalid webhook signature");
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Decode a verified Stripe event into the closed domain event set.
    fn decode_event(&self, payload: &[u8]) -> Result<WebhookEvent, WebhookError> {
        let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let kind = match stripe_event.event_type.as_str() {
            "checkout.session.completed" => {
                let (session_id, purchase_id) = self.extract_correlation(&stripe_event)?;
                WebhookEventKind::CheckoutCompleted {
                    session_id,
                    purchase_id,
                }
            }
            "checkout.session.expired" => {
                let (session_id, purchase_id) = self.extract_correlation(&stripe_event)?;
                WebhookEventKind::CheckoutExpired {
                    session_id,
                    purchase_id,
                }
            }
            other => WebhookEventKind::Ignored(other.to_string()),
        };

        Ok(WebhookEvent {
            id: stripe_event.id,
            kind,
            created_at: stripe_event.created,
        })
    }

    /// Pulls the session id and purchase correlation id out of a
    /// checkout.session.* event.
    fn extract_correlation(
        &self,
        event: &StripeWebhookEvent,
    ) -> Result<(String, PurchaseId), WebhookError> {
        let session: StripeCheckoutSession =
            serde_json::from_value(event.data.object.clone())
                .map_err(|e| WebhookError::ParseError(format!("invalid checkout session: {}", e)))?;

        let raw = session
            .metadata
            .get("purchase_id")
            .ok_or(WebhookError::MissingMetadata("purchase_id"))?;

        let purchase_id = PurchaseId::from_str(raw)
            .map_err(|_| WebhookError::ParseError(format!("invalid purchase_id: {}", raw)))?;

        Ok((session.id, purchase_id))
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let amount_cents = request.amount.as_cents().to_string();
        let purchase_id = request.purchase_id.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("success_url", &request.success_url),
            ("cancel_url", &request.cancel_url),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", &request.currency),
            (
                "line_items[0][price_data][product_data][name]",
                &request.product_name,
            ),
            ("line_items[0][price_data][unit_amount]", &amount_cents),
            ("metadata[purchase_id]", &purchase_id),
        ];

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let session: StripeCheckoutSessionResponse = response
                .json()
                .await
                .map_err(|e| PaymentError::provider(format!("invalid session response: {}", e)))?;
            return Ok(CheckoutSession {
                id: session.id,
                url: session.url,
                expires_at: session.expires_at,
            });
        }

        if status.as_u16() == 401 {
            return Err(PaymentError::authentication("Stripe rejected the API key"));
        }

        let message = response
            .json::<StripeErrorResponse>()
            .await
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("HTTP {}", status));
        Err(PaymentError::provider(message))
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, WebhookError> {
        let header = SignatureHeader::parse(signature)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        self.verify_signature(payload, &header)?;
        self.decode_event(payload)
    }
}

/// Computes a valid signature header for test fixtures.
#[cfg(test)]
pub fn sign_test_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}
