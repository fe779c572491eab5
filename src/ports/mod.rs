//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `CourseRepository` / `UserRepository` / `PurchaseRepository` /
//!   `ProgressRepository` - aggregate storage
//! - `WebhookEventRepository` - processed payment-webhook ledger
//!
//! ## External Service Ports
//!
//! - `PaymentProvider` - hosted checkout + signed webhook decoding
//! - `SessionValidator` / `IdentityAdmin` - identity provider
//! - `MediaStorage` - asset host for thumbnails

mod auth_provider;
mod course_repository;
mod media_storage;
mod payment_provider;
mod progress_repository;
mod purchase_repository;
mod user_repository;
mod webhook_event_repository;

pub use auth_provider::{IdentityAdmin, SessionValidator};
pub use course_repository::{CourseRepository, CourseSummary};
pub use media_storage::{MediaError, MediaStorage};
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
    WebhookEvent, WebhookEventKind,
};
pub use progress_repository::ProgressRepository;
pub use purchase_repository::PurchaseRepository;
pub use user_repository::UserRepository;
pub use webhook_event_repository::{SaveResult, WebhookEventRecord, WebhookEventRepository};
