//! Payment handlers: checkout initiation and webhook reconciliation.

mod begin_checkout;
mod handle_payment_webhook;

pub use begin_checkout::{BeginCheckoutCommand, BeginCheckoutHandler, BeginCheckoutResult};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, ReconciliationOutcome,
};
