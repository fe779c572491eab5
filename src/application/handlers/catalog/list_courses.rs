//! ListCoursesHandler - Query handler for the public catalog listing.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::ports::{CourseRepository, CourseSummary};

/// Query for the published-course listing.
#[derive(Debug, Clone, Default)]
pub struct ListCoursesQuery;

/// Handler returning published courses as summaries.
///
/// Course content and enrollment membership never leave the store for
/// this query.
pub struct ListCoursesHandler {
    courses: Arc<dyn CourseRepository>,
}

impl ListCoursesHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn handle(&self, _query: ListCoursesQuery) -> Result<Vec<CourseSummary>, CatalogError> {
        Ok(self.courses.list_published().await?)
    }
}
