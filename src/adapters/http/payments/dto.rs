//! Request/response DTOs for payment endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CourseId;

/// Request body for checkout initiation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub course_id: CourseId,
}

/// Response for a successfully initiated checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// Processor-hosted page the client should redirect to.
    pub redirect_url: String,
}

/// Acknowledgment body returned to the payment processor.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub acknowledged: bool,
}
