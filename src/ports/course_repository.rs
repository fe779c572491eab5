//! CourseRepository port - persistence and queries for courses.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::catalog::Course;
use crate::domain::foundation::{CourseId, DomainError, Money, Percentage, Rating, UserId};

/// Lightweight course listing entry.
///
/// Carries what the catalog listing needs; course content and enrollment
/// membership stay out of list responses.
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    pub id: CourseId,
    pub educator: UserId,
    pub educator_name: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub price: Money,
    pub discount: Percentage,
    pub rating_average: Option<f64>,
    pub rating_count: u32,
}

/// Port for course persistence.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persists a new course.
    async fn save(&self, course: &Course) -> Result<(), DomainError>;

    /// Updates an existing course's editable fields and content.
    async fn update(&self, course: &Course) -> Result<(), DomainError>;

    /// Deletes a course.
    async fn delete(&self, id: &CourseId) -> Result<(), DomainError>;

    /// Loads a full course aggregate.
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;

    /// Lists published courses as summaries.
    async fn list_published(&self) -> Result<Vec<CourseSummary>, DomainError>;

    /// Loads summaries for a specific set of courses.
    async fn find_summaries(&self, ids: &[CourseId]) -> Result<Vec<CourseSummary>, DomainError>;

    /// Lists an educator's courses (full aggregates).
    async fn list_by_educator(&self, educator: &UserId) -> Result<Vec<Course>, DomainError>;

    /// Adds a student to the course's enrolled set if not already present.
    ///
    /// Returns true if the membership was inserted by this call. The
    /// presence check and the insert are one atomic store operation, so
    /// concurrent duplicate deliveries enroll at most once.
    async fn enroll_student(&self, id: &CourseId, user_id: &UserId) -> Result<bool, DomainError>;

    /// Inserts or replaces one user's rating of a course.
    async fn upsert_rating(
        &self,
        id: &CourseId,
        user_id: &UserId,
        rating: Rating,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CourseRepository) {}
    }
}
