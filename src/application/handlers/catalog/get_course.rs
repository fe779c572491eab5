//! GetCourseHandler - Query handler for public course detail.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, Course};
use crate::domain::foundation::CourseId;
use crate::ports::CourseRepository;

/// Query for one course's detail view.
#[derive(Debug, Clone)]
pub struct GetCourseQuery {
    pub course_id: CourseId,
}

/// Handler returning course detail with locked lectures redacted.
///
/// This is the public detail endpoint: media URLs are blanked for every
/// lecture not marked free-preview. Enrolled students watch through the
/// player, which works from their enrollment, not from this view.
pub struct GetCourseHandler {
    courses: Arc<dyn CourseRepository>,
}

impl GetCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn handle(&self, query: GetCourseQuery) -> Result<Course, CatalogError> {
        let mut course = self
            .courses
            .find_by_id(&query.course_id)
            .await?
            .ok_or(CatalogError::NotFound(query.course_id))?;

        course.redact_locked_lectures();
        Ok(course)
    }
}
