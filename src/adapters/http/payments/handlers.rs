//! HTTP handlers for checkout initiation and the payment webhook.

use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::{AppState, ErrorResponse};
use crate::application::handlers::payments::{BeginCheckoutCommand, HandlePaymentWebhookCommand};
use crate::domain::purchase::{PurchaseError, WebhookError};

use super::dto::{CheckoutRequest, CheckoutResponse, WebhookAck};

/// POST /api/payments/checkout - Start a hosted checkout for a course.
pub async fn create_checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    // Return URLs are built from the requesting front-end's origin.
    let origin = headers
        .get("Origin")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .trim_end_matches('/')
        .to_string();
    if origin.is_empty() {
        return Err(PaymentsApiError::MissingOrigin);
    }

    let handler = state.begin_checkout_handler();
    let result = handler
        .handle(BeginCheckoutCommand {
            user_id: user.id,
            course_id: request.course_id,
            origin,
        })
        .await?;

    let response = CheckoutResponse {
        redirect_url: result.redirect_url,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/webhooks/payment - Payment processor webhook endpoint.
///
/// The body is taken as raw bytes and handed to verification untouched;
/// the signature covers the exact transmission. Any 2xx acknowledges
/// the event; non-2xx asks the processor to redeliver.
pub async fn handle_payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookApiError::MissingSignatureHeader)?
        .to_string();

    let handler = state.webhook_handler();
    let outcome = handler
        .handle(HandlePaymentWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await?;

    tracing::debug!(?outcome, "webhook acknowledged");
    Ok((StatusCode::OK, Json(WebhookAck { acknowledged: true })))
}

// ════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════

/// API error for checkout initiation.
pub enum PaymentsApiError {
    MissingOrigin,
    Purchase(PurchaseError),
}

impl From<PurchaseError> for PaymentsApiError {
    fn from(err: PurchaseError) -> Self {
        PaymentsApiError::Purchase(err)
    }
}

impl IntoResponse for PaymentsApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            PaymentsApiError::MissingOrigin => (
                StatusCode::BAD_REQUEST,
                "MISSING_ORIGIN",
                "Origin header is required".to_string(),
            ),
            PaymentsApiError::Purchase(err) => {
                let (status, code) = match err {
                    PurchaseError::CourseNotFound(_) => {
                        (StatusCode::NOT_FOUND, "COURSE_NOT_FOUND")
                    }
                    PurchaseError::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
                    PurchaseError::Upstream { .. } => {
                        (StatusCode::BAD_GATEWAY, "CHECKOUT_FAILED")
                    }
                    PurchaseError::Infrastructure(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                (status, code, err.message())
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

/// API error for the webhook endpoint.
///
/// Status codes drive the processor's retry behavior, so the mapping
/// comes from `WebhookError::status_code` unchanged.
pub enum WebhookApiError {
    MissingSignatureHeader,
    Webhook(WebhookError),
}

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        WebhookApiError::Webhook(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            WebhookApiError::MissingSignatureHeader => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "MISSING_SIGNATURE",
                    "Stripe-Signature header is required",
                )),
            )
                .into_response(),
            WebhookApiError::Webhook(err) => {
                let status = err.status_code();
                if status.is_server_error() {
                    tracing::error!(error = %err, "webhook processing failed; requesting redelivery");
                } else {
                    tracing::warn!(error = %err, "webhook rejected");
                }
                (
                    status,
                    Json(ErrorResponse::new("WEBHOOK_ERROR", err.to_string())),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CourseId, UserId};

    #[test]
    fn course_not_found_maps_to_404() {
        let err = PaymentsApiError::from(PurchaseError::course_not_found(CourseId::new()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn user_not_found_maps_to_404() {
        let err =
            PaymentsApiError::from(PurchaseError::user_not_found(UserId::new("u").unwrap()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_failure_maps_to_502() {
        let err = PaymentsApiError::from(PurchaseError::upstream("processor down"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_origin_maps_to_400() {
        assert_eq!(
            PaymentsApiError::MissingOrigin.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn invalid_signature_maps_to_401() {
        let err = WebhookApiError::from(WebhookError::InvalidSignature);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn transient_store_failure_maps_to_500_for_redelivery() {
        let err = WebhookApiError::from(WebhookError::Database("down".to_string()));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_signature_header_maps_to_400() {
        assert_eq!(
            WebhookApiError::MissingSignatureHeader
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
