//! Purchase-specific error types for checkout initiation.

use crate::domain::foundation::{CourseId, DomainError, UserId};

/// Errors from checkout initiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    /// Referenced course does not exist.
    CourseNotFound(CourseId),

    /// Referenced buyer does not exist.
    UserNotFound(UserId),

    /// The payment processor's session-creation call failed.
    ///
    /// The pending purchase record created before the call is left in
    /// place; a later webhook for it would still reconcile.
    Upstream { reason: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl PurchaseError {
    pub fn course_not_found(id: CourseId) -> Self {
        PurchaseError::CourseNotFound(id)
    }

    pub fn user_not_found(id: UserId) -> Self {
        PurchaseError::UserNotFound(id)
    }

    pub fn upstream(reason: impl Into<String>) -> Self {
        PurchaseError::Upstream {
            reason: reason.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PurchaseError::Infrastructure(message.into())
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            PurchaseError::CourseNotFound(id) => format!("Course not found: {}", id),
            PurchaseError::UserNotFound(id) => format!("User not found: {}", id),
            PurchaseError::Upstream { reason } => {
                format!("Failed to start checkout: {}", reason)
            }
            PurchaseError::Infrastructure(message) => message.clone(),
        }
    }
}

impl std::fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PurchaseError {}

impl From<DomainError> for PurchaseError {
    fn from(err: DomainError) -> Self {
        PurchaseError::Infrastructure(err.to_string())
    }
}
