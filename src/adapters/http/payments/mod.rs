//! Payment endpoints: checkout initiation and the processor webhook.

mod dto;
mod handlers;
mod routes;

pub use dto::{CheckoutRequest, CheckoutResponse, WebhookAck};
pub use handlers::{create_checkout, handle_payment_webhook, PaymentsApiError, WebhookApiError};
pub use routes::{checkout_routes, webhook_routes};
