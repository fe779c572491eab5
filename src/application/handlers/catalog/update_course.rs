//! UpdateCourseHandler - Command handler for editing an existing course.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, Course};
use crate::domain::foundation::{CourseId, Timestamp, UserId};
use crate::ports::{CourseRepository, MediaStorage};

use super::publish_course::CourseDraft;

/// Command to update a course the caller owns.
#[derive(Debug, Clone)]
pub struct UpdateCourseCommand {
    pub educator: UserId,
    pub course_id: CourseId,
    pub draft: CourseDraft,
    /// Replacement thumbnail; the stored one is kept when absent.
    pub thumbnail: Option<(String, Vec<u8>)>,
}

/// Handler for course edits.
///
/// Only the owning educator may edit, and ownership itself is immutable.
pub struct UpdateCourseHandler {
    courses: Arc<dyn CourseRepository>,
    media: Arc<dyn MediaStorage>,
}

impl UpdateCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, media: Arc<dyn MediaStorage>) -> Self {
        Self { courses, media }
    }

    pub async fn handle(&self, cmd: UpdateCourseCommand) -> Result<Course, CatalogError> {
        let mut course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or(CatalogError::NotFound(cmd.course_id))?;

        if !course.is_owned_by(&cmd.educator) {
            return Err(CatalogError::not_owner(course.id, cmd.educator));
        }

        if cmd.draft.title.trim().is_empty() {
            return Err(CatalogError::validation("title", "cannot be empty"));
        }

        if let Some((filename, bytes)) = cmd.thumbnail {
            let url = self
                .media
                .upload_image(&filename, bytes)
                .await
                .map_err(|e| CatalogError::media_upload_failed(e.to_string()))?;
            course.thumbnail_url = Some(url);
        }

        course.title = cmd.draft.title;
        course.description = cmd.draft.description;
        course.price = cmd.draft.price;
        course.discount = cmd.draft.discount;
        course.is_published = cmd.draft.is_published;
        course.chapters = cmd.draft.chapters;
        course.updated_at = Timestamp::now();

        self.courses.update(&course).await?;

        tracing::info!(course_id = %course.id, "course updated");
        Ok(course)
    }
}
