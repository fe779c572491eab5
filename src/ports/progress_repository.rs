//! ProgressRepository port - persistence for course progress.

use async_trait::async_trait;

use crate::domain::foundation::{CourseId, DomainError, UserId};
use crate::domain::learner::CourseProgress;

/// Port for study-progress persistence.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Loads one user's progress for one course.
    async fn find(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<CourseProgress>, DomainError>;

    /// Inserts or replaces the progress record.
    async fn upsert(&self, progress: &CourseProgress) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ProgressRepository) {}
    }
}
