//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the Edvora domain.

mod auth;
mod errors;
mod ids;
mod money;
mod percentage;
mod rating;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, UserRole};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ChapterId, CourseId, LectureId, PurchaseId, UserId};
pub use money::Money;
pub use percentage::Percentage;
pub use rating::Rating;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
