//! RateCourseHandler - Command handler for course ratings.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{CourseId, Rating, UserId};
use crate::ports::{CourseRepository, UserRepository};

/// Command to rate a course 1-5.
#[derive(Debug, Clone)]
pub struct RateCourseCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub rating: Rating,
}

/// Handler for ratings.
///
/// Only enrolled students may rate; re-rating replaces the previous
/// value rather than adding a second entry.
pub struct RateCourseHandler {
    courses: Arc<dyn CourseRepository>,
    users: Arc<dyn UserRepository>,
}

impl RateCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { courses, users }
    }

    pub async fn handle(&self, cmd: RateCourseCommand) -> Result<(), CatalogError> {
        let course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or(CatalogError::NotFound(cmd.course_id))?;

        let enrolled = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .map(|u| u.is_enrolled(&cmd.course_id))
            .unwrap_or(false);
        if !enrolled {
            return Err(CatalogError::not_enrolled(course.id, cmd.user_id));
        }

        self.courses
            .upsert_rating(&course.id, &cmd.user_id, cmd.rating)
            .await?;
        Ok(())
    }
}
