//! Mock payment provider for development and integration tests.
//!
//! Accepts any checkout request and returns a deterministic session.
//! Webhook "verification" checks a fixed signature token and reads a
//! small JSON contract instead of Stripe's schema; integration tests
//! drive the reconciliation flow through it without network access.

use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::foundation::PurchaseId;
use crate::domain::purchase::WebhookError;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider, WebhookEvent,
    WebhookEventKind,
};

/// Signature token accepted by the mock.
pub const MOCK_SIGNATURE: &str = "mock-signature";

/// Payload contract for mock webhook deliveries.
#[derive(Debug, Deserialize)]
struct MockWebhookPayload {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    purchase_id: String,
    #[serde(default)]
    created: i64,
}

/// In-process payment provider stub.
pub struct MockPaymentProvider {
    sessions: Mutex<Vec<CreateCheckoutRequest>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Checkout requests seen so far.
    pub fn sessions(&self) -> Vec<CreateCheckoutRequest> {
        self.sessions.lock().unwrap().clone()
    }
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let session_id = format!("cs_mock_{}", self.sessions.lock().unwrap().len() + 1);
        self.sessions.lock().unwrap().push(request);
        Ok(CheckoutSession {
            url: format!("https://checkout.mock.local/{}", session_id),
            id: session_id,
            expires_at: chrono::Utc::now().timestamp() + 3_600,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, WebhookError> {
        if signature != MOCK_SIGNATURE {
            return Err(WebhookError::InvalidSignature);
        }

        let parsed: MockWebhookPayload = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;
        let purchase_id = PurchaseId::from_str(&parsed.purchase_id)
            .map_err(|_| WebhookError::ParseError("invalid purchase_id".to_string()))?;

        let kind = match parsed.event_type.as_str() {
            "checkout.session.completed" => WebhookEventKind::CheckoutCompleted {
                session_id: "cs_mock_1".to_string(),
                purchase_id,
            },
            "checkout.session.expired" => WebhookEventKind::CheckoutExpired {
                session_id: "cs_mock_1".to_string(),
                purchase_id,
            },
            other => WebhookEventKind::Ignored(other.to_string()),
        };

        Ok(WebhookEvent {
            id: parsed.id,
            kind,
            created_at: parsed.created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;

    #[tokio::test]
    async fn mock_records_checkout_requests() {
        let provider = MockPaymentProvider::new();
        let session = provider
            .create_checkout_session(CreateCheckoutRequest {
                purchase_id: PurchaseId::new(),
                product_name: "Course".to_string(),
                amount: Money::from_cents(1_000).unwrap(),
                currency: "usd".to_string(),
                success_url: "https://app.local/ok".to_string(),
                cancel_url: "https://app.local/".to_string(),
            })
            .await
            .unwrap();

        assert!(session.url.contains("cs_mock_1"));
        assert_eq!(provider.sessions().len(), 1);
    }

    #[tokio::test]
    async fn mock_rejects_wrong_signature() {
        let provider = MockPaymentProvider::new();
        let result = provider.verify_webhook(b"{}", "wrong").await;
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[tokio::test]
    async fn mock_decodes_completed_payload() {
        let provider = MockPaymentProvider::new();
        let purchase_id = PurchaseId::new();
        let payload = serde_json::json!({
            "id": "evt_mock_1",
            "type": "checkout.session.completed",
            "purchase_id": purchase_id.to_string(),
        })
        .to_string();

        let event = provider
            .verify_webhook(payload.as_bytes(), MOCK_SIGNATURE)
            .await
            .unwrap();

        assert!(matches!(
            event.kind,
            WebhookEventKind::CheckoutCompleted { purchase_id: p, .. } if p == purchase_id
        ));
    }
}
