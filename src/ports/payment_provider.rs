//! Payment provider port for external payment processing.
//!
//! Defines the contract for the payment gateway integration. The
//! marketplace never touches card data: it asks the provider for a
//! hosted checkout session, then learns the outcome asynchronously via
//! signed webhooks.
//!
//! # Design
//!
//! - **Gateway agnostic**: the interface carries no provider types
//! - **Correlation by purchase id**: the session embeds the purchase
//!   record's id as opaque metadata; webhooks carry it back
//! - **Decoded once at the boundary**: webhook payloads are mapped to a
//!   closed event sum type here, never re-dispatched on raw strings

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, PurchaseId};
use crate::domain::purchase::WebhookError;

/// Port for the payment provider integration.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted checkout session for a purchase.
    ///
    /// Returns the session with a redirect URL for the buyer. The
    /// purchase id travels in session metadata and is the sole linkage
    /// from later webhook events back to durable state.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Verify a webhook signature and decode the event.
    ///
    /// `payload` must be the exact wire-transmitted body bytes: the
    /// signature is computed over the original transmission and will not
    /// tolerate re-serialization. Verification happens before any state
    /// is read or mutated; the error variants carry the retry semantics
    /// the webhook endpoint reports back to the processor.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, WebhookError>;
}

/// Request to create a hosted checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Purchase record id, embedded as session metadata.
    pub purchase_id: PurchaseId,

    /// Course title shown on the provider's hosted page.
    pub product_name: String,

    /// Amount to charge.
    pub amount: Money,

    /// ISO currency code (lowercase).
    pub currency: String,

    /// URL to redirect after successful checkout.
    pub success_url: String,

    /// URL to redirect after canceled checkout.
    pub cancel_url: String,
}

/// Hosted checkout session issued by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session id.
    pub id: String,

    /// URL for the buyer to complete checkout.
    pub url: String,

    /// When the session expires (Unix timestamp).
    pub expires_at: i64,
}

/// Verified webhook event from the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    /// Provider-assigned event id; key for the processed-event ledger.
    pub id: String,

    /// Decoded event kind.
    pub kind: WebhookEventKind,

    /// When the event was created (Unix timestamp).
    pub created_at: i64,
}

/// The closed set of event kinds the reconciliation engine understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventKind {
    /// Hosted checkout completed; the buyer paid.
    CheckoutCompleted {
        session_id: String,
        purchase_id: PurchaseId,
    },

    /// Hosted checkout expired without payment.
    CheckoutExpired {
        session_id: String,
        purchase_id: PurchaseId,
    },

    /// Any other event type; acknowledged without action.
    Ignored(String),
}

impl WebhookEventKind {
    /// Short label for logging.
    pub fn label(&self) -> &str {
        match self {
            WebhookEventKind::CheckoutCompleted { .. } => "checkout.completed",
            WebhookEventKind::CheckoutExpired { .. } => "checkout.expired",
            WebhookEventKind::Ignored(name) => name,
        }
    }
}

/// Errors from payment provider operations.
#[derive(Debug, Clone)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Create an invalid webhook error.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }

    /// Create a provider API error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Amount or request parameters rejected by the provider.
    InvalidRequest,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Invalid webhook signature or payload.
    InvalidWebhook,

    /// Provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn payment_error_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(PaymentErrorCode::RateLimitExceeded.is_retryable());

        assert!(!PaymentErrorCode::InvalidWebhook.is_retryable());
        assert!(!PaymentErrorCode::AuthenticationError.is_retryable());
    }

    #[test]
    fn payment_error_display_includes_code_and_message() {
        let err = PaymentError::invalid_webhook("signature mismatch");
        assert!(err.to_string().contains("invalid_webhook"));
        assert!(err.to_string().contains("signature mismatch"));
    }

    #[test]
    fn event_kind_labels() {
        let completed = WebhookEventKind::CheckoutCompleted {
            session_id: "cs_1".to_string(),
            purchase_id: PurchaseId::new(),
        };
        assert_eq!(completed.label(), "checkout.completed");

        let ignored = WebhookEventKind::Ignored("charge.refunded".to_string());
        assert_eq!(ignored.label(), "charge.refunded");
    }
}
