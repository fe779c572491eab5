//! EnrolledCoursesHandler - Query handler for a student's course list.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::UserId;
use crate::ports::{CourseRepository, CourseSummary, UserRepository};

/// Query for the caller's enrolled courses.
#[derive(Debug, Clone)]
pub struct EnrolledCoursesQuery {
    pub user_id: UserId,
}

/// Handler resolving the user's enrolled set to course summaries.
///
/// A missing user yields an empty list rather than an error; the caller
/// may simply not have contacted the service before.
pub struct EnrolledCoursesHandler {
    users: Arc<dyn UserRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl EnrolledCoursesHandler {
    pub fn new(users: Arc<dyn UserRepository>, courses: Arc<dyn CourseRepository>) -> Self {
        Self { users, courses }
    }

    pub async fn handle(
        &self,
        query: EnrolledCoursesQuery,
    ) -> Result<Vec<CourseSummary>, CatalogError> {
        let Some(user) = self.users.find_by_id(&query.user_id).await? else {
            return Ok(Vec::new());
        };

        Ok(self.courses.find_summaries(&user.enrolled_courses).await?)
    }
}
