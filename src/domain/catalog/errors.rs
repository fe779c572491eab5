//! Catalog-specific error types.

use crate::domain::foundation::{CourseId, DomainError, UserId};

/// Errors from catalog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Course was not found.
    NotFound(CourseId),

    /// Caller does not own the course.
    NotOwner { course: CourseId, caller: UserId },

    /// Caller must be enrolled to perform the operation.
    NotEnrolled { course: CourseId, caller: UserId },

    /// Course thumbnail image missing from the upload.
    ThumbnailMissing,

    /// Asset host upload failed.
    MediaUploadFailed(String),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl CatalogError {
    pub fn not_found(id: CourseId) -> Self {
        CatalogError::NotFound(id)
    }

    pub fn not_owner(course: CourseId, caller: UserId) -> Self {
        CatalogError::NotOwner { course, caller }
    }

    pub fn not_enrolled(course: CourseId, caller: UserId) -> Self {
        CatalogError::NotEnrolled { course, caller }
    }

    pub fn media_upload_failed(reason: impl Into<String>) -> Self {
        CatalogError::MediaUploadFailed(reason.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CatalogError::Infrastructure(message.into())
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            CatalogError::NotFound(id) => format!("Course not found: {}", id),
            CatalogError::NotOwner { course, .. } => {
                format!("Caller does not own course {}", course)
            }
            CatalogError::NotEnrolled { course, .. } => {
                format!("Caller is not enrolled in course {}", course)
            }
            CatalogError::ThumbnailMissing => "Thumbnail image not attached".to_string(),
            CatalogError::MediaUploadFailed(reason) => {
                format!("Thumbnail upload failed: {}", reason)
            }
            CatalogError::ValidationFailed { field, message } => {
                format!("Invalid {}: {}", field, message)
            }
            CatalogError::Infrastructure(message) => message.clone(),
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CatalogError {}

impl From<DomainError> for CatalogError {
    fn from(err: DomainError) -> Self {
        CatalogError::Infrastructure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_includes_id() {
        let id = CourseId::new();
        let err = CatalogError::not_found(id);
        assert!(err.message().contains(&id.to_string()));
    }

    #[test]
    fn domain_error_converts_to_infrastructure() {
        let err: CatalogError = DomainError::database("pool exhausted").into();
        assert!(matches!(err, CatalogError::Infrastructure(_)));
    }
}
