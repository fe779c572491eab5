//! PostgreSQL adapters for the repository ports.

mod course_repository;
mod progress_repository;
mod purchase_repository;
mod user_repository;
mod webhook_event_repository;

pub use course_repository::PostgresCourseRepository;
pub use progress_repository::PostgresProgressRepository;
pub use purchase_repository::PostgresPurchaseRepository;
pub use user_repository::PostgresUserRepository;
pub use webhook_event_repository::PostgresWebhookEventRepository;
